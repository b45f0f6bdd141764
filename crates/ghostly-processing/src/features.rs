//! Amplitude metrics for one channel

use serde::{Deserialize, Serialize};

/// Amplitude estimators of muscle activation intensity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmplitudeMetrics {
    /// Root mean square
    pub rms: f32,
    /// Mean absolute value
    pub mav: f32,
}

impl AmplitudeMetrics {
    /// Zero for an empty signal
    pub fn calculate(signal: &[f32]) -> Self {
        if signal.is_empty() {
            return Self::default();
        }

        let n = signal.len() as f32;
        let sum_sq: f32 = signal.iter().map(|x| x * x).sum();

        Self {
            rms: (sum_sq / n).sqrt(),
            mav: signal.iter().map(|x| x.abs()).sum::<f32>() / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_metrics() {
        let metrics = AmplitudeMetrics::calculate(&[3.0, -4.0]);
        assert!((metrics.rms - 12.5f32.sqrt()).abs() < 1e-6);
        assert!((metrics.mav - 3.5).abs() < 1e-6);
        assert_eq!(AmplitudeMetrics::calculate(&[]), AmplitudeMetrics::default());
    }
}
