//! Synthesizer options and the sample-domain timing derived from them

use ghostly_core::{GhostlyError, GhostlyResult, SessionLayout};
use serde::{Deserialize, Serialize};

/// Guard band kept free of contractions at each end of the recording
pub const GUARD_BAND_SECONDS: f32 = 5.0;
/// Candidate slot length
pub const SLOT_LENGTH_SECONDS: f32 = 3.0;
/// Stride between candidate slot starts
pub const SLOT_STRIDE_SECONDS: f32 = 1.0;
pub const PAUSE_MIN_SECONDS: f32 = 10.0;
pub const PAUSE_MAX_SECONDS: f32 = 20.0;
/// Pause start jitter, applied as +/- this value
pub const PAUSE_JITTER_SECONDS: f32 = 5.0;
pub const LONG_CONTRACTION_SECONDS: (f32, f32) = (1.0, 2.0);
pub const SHORT_CONTRACTION_SECONDS: (f32, f32) = (0.3, 0.7);
/// Smallest random offset range when placing a burst inside its window
pub const MIN_PLACEMENT_ROOM_SECONDS: f32 = 0.1;

const MIN_SAMPLING_RATE: f32 = 100.0;
const MAX_SAMPLING_RATE: f32 = 10_000.0;

/// Configuration for one synthetic recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerOptions {
    /// Total recording length in seconds
    pub duration_seconds: f32,
    /// Internal simulation resolution in Hz
    pub sampling_rate: f32,
    /// Only every Nth internal sample is emitted
    pub downsample_factor: usize,
    /// Contraction bursts to distribute across the timeline
    pub target_contractions: usize,
    /// Carve 2-3 obstacle windows out of the slot timeline
    pub include_pauses: bool,
    /// Hold both channels at baseline inside obstacle windows
    pub suppress_during_pauses: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for SynthesizerOptions {
    fn default() -> Self {
        Self {
            duration_seconds: 120.0,
            sampling_rate: 1000.0,
            downsample_factor: 100,
            target_contractions: 15,
            include_pauses: true,
            suppress_during_pauses: false,
            seed: None,
        }
    }
}

impl SynthesizerOptions {
    /// Strict validation for callers that want errors instead of clamping
    pub fn validate(&self) -> GhostlyResult<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(GhostlyError::InvalidDuration {
                seconds: self.duration_seconds,
            });
        }

        if !(MIN_SAMPLING_RATE..=MAX_SAMPLING_RATE).contains(&self.sampling_rate) {
            return Err(GhostlyError::InvalidSamplingRate {
                rate: self.sampling_rate,
                valid_range: "100-10000Hz",
            });
        }

        if self.downsample_factor == 0 {
            return Err(GhostlyError::InvalidDownsampleFactor {
                factor: self.downsample_factor,
            });
        }

        Ok(())
    }

    /// Clamp every field into a range the generator can walk
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();

        let duration_seconds = if self.duration_seconds.is_finite() {
            self.duration_seconds.max(0.0)
        } else {
            defaults.duration_seconds
        };

        let sampling_rate = if self.sampling_rate.is_finite() && self.sampling_rate > 0.0 {
            self.sampling_rate
        } else {
            defaults.sampling_rate
        };

        Self {
            duration_seconds,
            sampling_rate,
            downsample_factor: self.downsample_factor.max(1),
            ..self.clone()
        }
    }

    /// Internal samples walked by the generator
    pub fn total_samples(&self) -> usize {
        (self.duration_seconds * self.sampling_rate).round().max(0.0) as usize
    }

    pub fn layout(&self) -> SessionLayout {
        SessionLayout {
            sampling_rate: self.sampling_rate,
            downsample_factor: self.downsample_factor.max(1),
            total_samples: self.total_samples(),
        }
    }

    pub fn timing(&self) -> SynthesisTiming {
        SynthesisTiming::at_rate(self.sampling_rate)
    }

    pub fn with_target(mut self, target_contractions: usize) -> Self {
        self.target_contractions = target_contractions;
        self
    }

    pub fn with_pauses(mut self, include_pauses: bool) -> Self {
        self.include_pauses = include_pauses;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Timing constants converted to internal samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisTiming {
    pub guard_band: usize,
    pub slot_length: usize,
    pub slot_stride: usize,
    pub pause_min: usize,
    pub pause_max: usize,
    pub pause_jitter: usize,
    pub long_min: usize,
    pub long_max: usize,
    pub short_min: usize,
    pub short_max: usize,
    pub min_placement_room: usize,
}

impl SynthesisTiming {
    pub fn at_rate(sampling_rate: f32) -> Self {
        let samples = |seconds: f32| (seconds * sampling_rate).round().max(0.0) as usize;

        Self {
            guard_band: samples(GUARD_BAND_SECONDS),
            slot_length: samples(SLOT_LENGTH_SECONDS).max(1),
            slot_stride: samples(SLOT_STRIDE_SECONDS).max(1),
            pause_min: samples(PAUSE_MIN_SECONDS),
            pause_max: samples(PAUSE_MAX_SECONDS),
            pause_jitter: samples(PAUSE_JITTER_SECONDS),
            long_min: samples(LONG_CONTRACTION_SECONDS.0),
            long_max: samples(LONG_CONTRACTION_SECONDS.1),
            short_min: samples(SHORT_CONTRACTION_SECONDS.0),
            short_max: samples(SHORT_CONTRACTION_SECONDS.1),
            min_placement_room: samples(MIN_PLACEMENT_ROOM_SECONDS),
        }
    }
}
