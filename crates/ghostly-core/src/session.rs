//! SyntheticSession: container for one generated recording

use crate::emg_types::{ContractionTiming, EMGDataPoint, MuscleSide, PausePeriod};
use crate::error::{GhostlyError, GhostlyResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal resolution of a generated recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionLayout {
    /// Internal simulation rate in Hz
    pub sampling_rate: f32,
    /// Only every Nth internal sample is emitted
    pub downsample_factor: usize,
    /// Internal samples walked by the synthesizer
    pub total_samples: usize,
}

impl SessionLayout {
    /// Rate of the emitted points in Hz
    pub fn emitted_rate(&self) -> f32 {
        self.sampling_rate / self.downsample_factor.max(1) as f32
    }

    /// Time in seconds of an internal sample
    ///
    /// Computed in `f64` so long high-rate recordings keep distinct stamps.
    pub fn time_at(&self, sample: usize) -> f64 {
        sample as f64 / self.sampling_rate as f64
    }

    /// Expected number of emitted points
    pub fn expected_points(&self) -> usize {
        let factor = self.downsample_factor.max(1);
        (self.total_samples + factor - 1) / factor
    }
}

/// Generated bilateral recording with the timings that shaped it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticSession {
    /// Unique identifier for this session
    pub id: Uuid,
    /// Creation timestamp (ms since Unix epoch)
    pub created_at: u64,
    pub layout: SessionLayout,
    /// Obstacle windows, in internal samples
    pub pauses: Vec<PausePeriod>,
    /// Realized contraction events sorted by start
    pub contractions: Vec<ContractionTiming>,
    /// Emitted points in chronological order
    pub points: Vec<EMGDataPoint>,
}

impl SyntheticSession {
    pub fn new(
        layout: SessionLayout,
        pauses: Vec<PausePeriod>,
        contractions: Vec<ContractionTiming>,
        points: Vec<EMGDataPoint>,
    ) -> Self {
        SyntheticSession {
            id: Uuid::new_v4(),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as u64)
                .unwrap_or(0),
            layout,
            pauses,
            contractions,
            points,
        }
    }

    /// Number of emitted points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recording duration in seconds
    pub fn duration(&self) -> f32 {
        self.layout.total_samples as f32 / self.layout.sampling_rate
    }

    /// Amplitudes of one channel, one per emitted point
    pub fn channel_data(&self, side: MuscleSide) -> Vec<f32> {
        self.points.iter().map(|point| point.amplitude(side)).collect()
    }

    /// Time vector for plotting
    pub fn time_vector(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.time).collect()
    }

    pub fn channel_stats(&self, side: MuscleSide) -> ChannelStats {
        ChannelStats::calculate(&self.channel_data(side))
    }

    /// Count of realized events, optionally restricted to one side
    pub fn contraction_count(&self, side: Option<MuscleSide>) -> usize {
        match side {
            Some(side) => self.contractions.iter().filter(|c| c.side == side).count(),
            None => self.contractions.len(),
        }
    }

    /// Borrow the points whose time falls in `[start_time, end_time)`
    pub fn slice_time(&self, start_time: f32, end_time: f32) -> GhostlyResult<&[EMGDataPoint]> {
        if start_time < 0.0 || end_time > self.duration() || start_time >= end_time {
            return Err(GhostlyError::InvalidTimeRange {
                start: start_time,
                end: end_time,
                duration: self.duration(),
            });
        }

        let (start, end) = (start_time as f64, end_time as f64);
        let first = self.points.partition_point(|point| point.time < start);
        let last = self.points.partition_point(|point| point.time < end);

        Ok(&self.points[first..last])
    }

    /// Hand the points to a chart consumer
    pub fn into_points(self) -> Vec<EMGDataPoint> {
        self.points
    }
}

/// Amplitude summary of one quadriceps channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f32,
    pub rms: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub peak_to_peak: f32,
}

impl ChannelStats {
    /// Single pass with `f64` accumulators; all zero for an empty channel
    pub fn calculate(data: &[f32]) -> Self {
        let Some(&first) = data.first() else {
            return Self::default();
        };

        let (sum, sum_sq, min, max) = data.iter().fold(
            (0.0f64, 0.0f64, first, first),
            |(sum, sum_sq, min, max), &value| {
                let wide = value as f64;
                (sum + wide, sum_sq + wide * wide, min.min(value), max.max(value))
            },
        );

        let n = data.len() as f64;
        let mean = sum / n;
        let mean_square = sum_sq / n;

        Self {
            mean: mean as f32,
            rms: mean_square.sqrt() as f32,
            std_dev: (mean_square - mean * mean).max(0.0).sqrt() as f32,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}
