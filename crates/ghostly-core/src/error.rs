//! Error handling for the GHOSTLY workbench
//!
//! The synthesizer itself never fails: degenerate options are clamped.
//! These errors surface from strict validation, session slicing and
//! contraction analysis.

use core::fmt;

/// Result type alias for GHOSTLY operations
pub type GhostlyResult<T> = Result<T, GhostlyError>;

/// Error type for all GHOSTLY operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GhostlyError {
    /// Recording duration must be positive and finite
    InvalidDuration {
        /// Requested duration in seconds
        seconds: f32,
    },

    /// Sampling rate outside the supported range
    InvalidSamplingRate {
        /// Provided sampling rate
        rate: f32,
        /// Valid range description
        valid_range: &'static str,
    },

    /// Downsample factor of zero
    InvalidDownsampleFactor {
        /// Provided factor
        factor: usize,
    },

    /// Time range does not fit inside the session
    InvalidTimeRange {
        /// Requested start in seconds
        start: f32,
        /// Requested end in seconds
        end: f32,
        /// Session duration in seconds
        duration: f32,
    },

    /// Contraction analysis parameters rejected
    InvalidAnalysisConfig {
        /// Description of the configuration error
        reason: &'static str,
    },

    /// Configuration could not be (de)serialized
    ConfigurationError {
        /// Underlying parser message
        message: String,
    },

    /// Operation needs at least one sample
    EmptySignal,
}

impl fmt::Display for GhostlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GhostlyError::InvalidDuration { seconds } => {
                write!(f, "Invalid duration: {}s, must be positive", seconds)
            }
            GhostlyError::InvalidSamplingRate { rate, valid_range } => {
                write!(f, "Invalid sampling rate: {}Hz, valid range: {}",
                       rate, valid_range)
            }
            GhostlyError::InvalidDownsampleFactor { factor } => {
                write!(f, "Invalid downsample factor: {}, must be at least 1", factor)
            }
            GhostlyError::InvalidTimeRange { start, end, duration } => {
                write!(f, "Invalid time range [{:.3}, {:.3}]s for session duration {:.3}s",
                       start, end, duration)
            }
            GhostlyError::InvalidAnalysisConfig { reason } => {
                write!(f, "Invalid analysis configuration: {}", reason)
            }
            GhostlyError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            GhostlyError::EmptySignal => write!(f, "Signal contains no samples"),
        }
    }
}

impl std::error::Error for GhostlyError {}

/// Convenience macro for creating analysis configuration errors
#[macro_export]
macro_rules! config_error {
    ($reason:literal) => {
        $crate::error::GhostlyError::InvalidAnalysisConfig {
            reason: $reason
        }
    };
}
