//! Bilateral quadriceps EMG types and synthesis timings

use serde::{Deserialize, Serialize};

/// Quadriceps channel of the bilateral recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MuscleSide {
    Left,
    Right,
}

impl MuscleSide {
    /// The other leg
    pub fn opposite(self) -> Self {
        match self {
            MuscleSide::Left => MuscleSide::Right,
            MuscleSide::Right => MuscleSide::Left,
        }
    }

    pub const BOTH: [MuscleSide; 2] = [MuscleSide::Left, MuscleSide::Right];
}

impl std::fmt::Display for MuscleSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MuscleSide::Left => write!(f, "Left"),
            MuscleSide::Right => write!(f, "Right"),
        }
    }
}

/// One emitted sample of the bilateral time series
///
/// Serialized with the camelCase keys the chart components read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EMGDataPoint {
    /// Time in seconds from the start of the recording
    pub time: f64,
    /// Left quadriceps amplitude (unitless, 0 to ~1.3)
    pub left_quadriceps: f32,
    /// Right quadriceps amplitude (unitless, 0 to ~1.3)
    pub right_quadriceps: f32,
}

impl EMGDataPoint {
    pub fn amplitude(&self, side: MuscleSide) -> f32 {
        match side {
            MuscleSide::Left => self.left_quadriceps,
            MuscleSide::Right => self.right_quadriceps,
        }
    }
}

/// Closed interval of internal sample indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWindow {
    pub start: usize,
    pub end: usize,
}

/// In-game obstacle window in which no new contraction should originate
pub type PausePeriod = SampleWindow;

impl SampleWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of samples between start and end
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Inclusive membership test
    pub fn contains(&self, sample: usize) -> bool {
        sample >= self.start && sample <= self.end
    }

    /// Closed-interval overlap, touching endpoints count
    pub fn intersects(&self, other: &SampleWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// Pre-computed contraction burst on one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractionTiming {
    /// First active sample
    pub start: usize,
    /// Active sample count
    pub duration: usize,
    pub side: MuscleSide,
    /// Long (1-2 s) or short (0.3-0.7 s) burst
    pub is_long: bool,
    /// Envelope peak drawn once per event
    pub peak_amplitude: f32,
}

impl ContractionTiming {
    /// One past the last active sample
    pub fn end(&self) -> usize {
        self.start + self.duration
    }

    /// Half-open membership test over `[start, end)`
    pub fn contains(&self, sample: usize) -> bool {
        sample >= self.start && sample < self.end()
    }

    /// Position of `sample` through the event, 0.0 at start
    pub fn progress(&self, sample: usize) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        (sample.saturating_sub(self.start)) as f32 / self.duration as f32
    }

    /// Whether this event's active range touches a window
    pub fn overlaps(&self, window: &SampleWindow) -> bool {
        self.duration > 0 && self.start <= window.end && self.end() > window.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_point_serializes_camel_case() {
        let point = EMGDataPoint {
            time: 0.5,
            left_quadriceps: 0.02,
            right_quadriceps: 0.9,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"leftQuadriceps\""));
        assert!(json.contains("\"rightQuadriceps\""));
        assert_eq!(point.amplitude(MuscleSide::Right), 0.9);
    }

    #[test]
    fn test_window_intersection_is_closed() {
        let pause = SampleWindow::new(10_000, 20_000);
        assert!(SampleWindow::new(7_000, 10_000).intersects(&pause));
        assert!(SampleWindow::new(20_000, 23_000).intersects(&pause));
        assert!(SampleWindow::new(5_000, 25_000).intersects(&pause));
        assert!(!SampleWindow::new(6_000, 9_000).intersects(&pause));
        assert!(pause.contains(20_000));
        assert_eq!(pause.len(), 10_000);
    }

    #[test]
    fn test_contraction_progress() {
        let contraction = ContractionTiming {
            start: 1000,
            duration: 500,
            side: MuscleSide::Left,
            is_long: false,
            peak_amplitude: 0.7,
        };
        assert_eq!(contraction.end(), 1500);
        assert!(contraction.contains(1000));
        assert!(!contraction.contains(1500));
        assert_eq!(contraction.progress(1250), 0.5);
        assert_eq!(MuscleSide::Left.opposite(), MuscleSide::Right);
    }
}
