//! Contraction analysis parameters

use ghostly_core::{config_error, GhostlyError, GhostlyResult};
use serde::{Deserialize, Serialize};

/// Smoothing span the clinical defaults assume, in milliseconds
const SMOOTHING_SPAN_MS: f32 = 25.0;

/// Parameters for threshold-based contraction detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fraction of the smoothed maximum used as detection threshold
    pub threshold_factor: f32,
    /// Shorter events are discarded
    pub min_duration_ms: u32,
    /// Moving-average window in samples
    pub smoothing_window: usize,
    /// Events separated by at most this gap are one contraction
    pub merge_threshold_ms: u32,
    /// Dead time after a contraction ends (0 disables)
    pub refractory_period_ms: u32,
    /// Peak amplitude a contraction must reach to count as good
    pub mvc_amplitude_threshold: Option<f32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::clinical()
    }
}

impl AnalysisConfig {
    /// Defaults used for 1 kHz uploads
    pub fn clinical() -> Self {
        Self {
            threshold_factor: 0.3,
            min_duration_ms: 50,
            smoothing_window: 25,
            merge_threshold_ms: 200,
            refractory_period_ms: 0,
            mvc_amplitude_threshold: None,
        }
    }

    /// Clinical defaults with the smoothing window rescaled to `sampling_rate`
    pub fn for_rate(sampling_rate: f32) -> Self {
        let window = (SMOOTHING_SPAN_MS * sampling_rate / 1000.0).round().max(1.0);
        Self {
            smoothing_window: window as usize,
            ..Self::clinical()
        }
    }

    /// Set the MVC threshold from an MVC value and a percentage of it
    pub fn with_mvc(mut self, mvc_value: f32, threshold_percentage: f32) -> Self {
        self.mvc_amplitude_threshold = Some(mvc_value * threshold_percentage / 100.0);
        self
    }

    pub fn validate(&self) -> GhostlyResult<()> {
        if !(self.threshold_factor > 0.0 && self.threshold_factor <= 1.0) {
            return Err(config_error!("threshold factor must be in (0, 1]"));
        }

        if self.smoothing_window == 0 {
            return Err(config_error!("smoothing window must be at least one sample"));
        }

        if let Some(threshold) = self.mvc_amplitude_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(config_error!("MVC threshold must be a non-negative amplitude"));
            }
        }

        Ok(())
    }

    /// Whole milliseconds converted to samples, truncating
    pub(crate) fn ms_to_samples(ms: u32, sampling_rate: f32) -> usize {
        (ms as f32 / 1000.0 * sampling_rate).max(0.0) as usize
    }

    pub fn to_json(&self) -> GhostlyResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GhostlyError::ConfigurationError {
            message: format!("Failed to serialize analysis config: {}", e),
        })
    }

    pub fn from_json(json: &str) -> GhostlyResult<Self> {
        serde_json::from_str(json).map_err(|e| GhostlyError::ConfigurationError {
            message: format!("Failed to parse analysis config: {}", e),
        })
    }
}
