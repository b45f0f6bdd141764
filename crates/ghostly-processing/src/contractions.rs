//! Threshold-based contraction detection
//!
//! Rectify, smooth, threshold at a fraction of the smoothed maximum,
//! then clean the detected runs: minimum duration, optional refractory
//! period, and merging of runs separated by short gaps.

use crate::config::AnalysisConfig;
use crate::smoothing::{moving_average_same, rectify};
use serde::{Deserialize, Serialize};

/// Smoothed maxima below this are treated as a flat signal
const FLAT_SIGNAL_LEVEL: f32 = 1e-9;

/// One detected contraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedContraction {
    pub start_time_ms: f32,
    pub end_time_ms: f32,
    pub duration_ms: f32,
    /// Mean of the rectified segment
    pub mean_amplitude: f32,
    /// Peak of the rectified segment
    pub max_amplitude: f32,
    /// Reached the MVC threshold; `None` when no threshold was given
    pub is_good: Option<bool>,
}

/// Per-channel contraction summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContractionAnalysis {
    pub contraction_count: usize,
    pub avg_duration_ms: f32,
    pub min_duration_ms: f32,
    pub max_duration_ms: f32,
    pub total_time_under_tension_ms: f32,
    /// Average of the per-contraction mean amplitudes
    pub avg_amplitude: f32,
    /// Largest per-contraction peak
    pub max_amplitude: f32,
    pub contractions: Vec<DetectedContraction>,
    pub good_contraction_count: Option<usize>,
    pub mvc_threshold: Option<f32>,
}

impl ContractionAnalysis {
    fn empty(mvc_threshold: Option<f32>) -> Self {
        Self {
            good_contraction_count: mvc_threshold.map(|_| 0),
            mvc_threshold,
            ..Default::default()
        }
    }

    fn from_contractions(contractions: Vec<DetectedContraction>, mvc_threshold: Option<f32>) -> Self {
        if contractions.is_empty() {
            return Self::empty(mvc_threshold);
        }

        let count = contractions.len() as f32;
        let durations = contractions.iter().map(|c| c.duration_ms);
        let total: f32 = durations.clone().sum();

        Self {
            contraction_count: contractions.len(),
            avg_duration_ms: total / count,
            min_duration_ms: durations.clone().fold(f32::INFINITY, f32::min),
            max_duration_ms: durations.fold(f32::NEG_INFINITY, f32::max),
            total_time_under_tension_ms: total,
            avg_amplitude: contractions.iter().map(|c| c.mean_amplitude).sum::<f32>() / count,
            max_amplitude: contractions.iter().map(|c| c.max_amplitude).fold(0.0, f32::max),
            good_contraction_count: mvc_threshold
                .map(|_| contractions.iter().filter(|c| c.is_good == Some(true)).count()),
            mvc_threshold,
            contractions,
        }
    }
}

/// Runs of above-threshold samples as `(start, end)`
///
/// `end` is the first sample back below threshold, or the last index when
/// the signal finishes above it.
fn threshold_runs(smoothed: &[f32], threshold: f32) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = None;

    for (index, &value) in smoothed.iter().enumerate() {
        match (value > threshold, run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                runs.push((start, index));
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        runs.push((start, smoothed.len() - 1));
    }

    runs
}

/// Drop short runs and runs starting inside the refractory period
fn filter_runs(runs: &[(usize, usize)], min_samples: usize, refractory_samples: usize) -> Vec<(usize, usize)> {
    let mut kept: Vec<(usize, usize)> = Vec::with_capacity(runs.len());

    for (index, &(start, end)) in runs.iter().enumerate() {
        if end - start < min_samples {
            continue;
        }

        if refractory_samples > 0 && index > 0 {
            let last_end = kept.last().map(|&(_, end)| end).unwrap_or(0);
            if start.saturating_sub(last_end) < refractory_samples {
                continue;
            }
        }

        kept.push((start, end));
    }

    kept
}

/// Fuse runs whose gap is at most `merge_samples`
fn merge_runs(runs: Vec<(usize, usize)>, merge_samples: usize) -> Vec<(usize, usize)> {
    if merge_samples == 0 {
        return runs;
    }

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(runs.len());
    for (start, end) in runs {
        if let Some(previous) = merged.last_mut() {
            if start.saturating_sub(previous.1) <= merge_samples {
                previous.1 = end;
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Detect contractions in one channel
///
/// Signals shorter than the smoothing window, a zero window, or a flat
/// signal produce an empty analysis rather than an error.
pub fn detect_contractions(
    signal: &[f32],
    sampling_rate: f32,
    config: &AnalysisConfig,
) -> ContractionAnalysis {
    let mvc_threshold = config.mvc_amplitude_threshold;

    if config.smoothing_window == 0 || signal.len() < config.smoothing_window || sampling_rate <= 0.0 {
        return ContractionAnalysis::empty(mvc_threshold);
    }

    let rectified = rectify(signal);
    let smoothed = moving_average_same(&rectified, config.smoothing_window);

    let max_smoothed = smoothed.iter().copied().fold(0.0, f32::max);
    if max_smoothed < FLAT_SIGNAL_LEVEL {
        return ContractionAnalysis::empty(mvc_threshold);
    }

    let runs = threshold_runs(&smoothed, max_smoothed * config.threshold_factor);
    let kept = filter_runs(
        &runs,
        AnalysisConfig::ms_to_samples(config.min_duration_ms, sampling_rate),
        AnalysisConfig::ms_to_samples(config.refractory_period_ms, sampling_rate),
    );
    let merged = merge_runs(kept, AnalysisConfig::ms_to_samples(config.merge_threshold_ms, sampling_rate));

    let to_ms = |samples: usize| samples as f32 / sampling_rate * 1000.0;

    let contractions = merged
        .into_iter()
        .map(|(start, end)| {
            let segment = &rectified[start..=end];
            let max_amplitude = segment.iter().copied().fold(0.0, f32::max);

            DetectedContraction {
                start_time_ms: to_ms(start),
                end_time_ms: to_ms(end),
                duration_ms: to_ms(end - start),
                mean_amplitude: segment.iter().sum::<f32>() / segment.len() as f32,
                max_amplitude,
                is_good: mvc_threshold.map(|threshold| max_amplitude >= threshold),
            }
        })
        .collect();

    ContractionAnalysis::from_contractions(contractions, mvc_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f32 = 1000.0;

    /// Baseline of 0.02 with unit plateaus over the given sample ranges
    fn bursts(len: usize, ranges: &[(usize, usize)]) -> Vec<f32> {
        let mut signal = vec![0.02; len];
        for &(start, end) in ranges {
            for value in &mut signal[start..end] {
                *value = 1.0;
            }
        }
        signal
    }

    fn unsmoothed() -> AnalysisConfig {
        AnalysisConfig {
            smoothing_window: 1,
            ..AnalysisConfig::clinical()
        }
    }

    #[test]
    fn test_detects_separate_bursts() {
        let signal = bursts(5000, &[(500, 1500), (2500, 2800), (4000, 4600)]);
        let analysis = detect_contractions(&signal, RATE, &unsmoothed());

        assert_eq!(analysis.contraction_count, 3);
        let first = &analysis.contractions[0];
        assert_eq!(first.start_time_ms, 500.0);
        assert_eq!(first.duration_ms, 1000.0);
        assert_eq!(analysis.max_duration_ms, 1000.0);
        assert!((analysis.min_duration_ms - 300.0).abs() < 1e-2);
        assert!((analysis.total_time_under_tension_ms - 1900.0).abs() < 1e-2);
        assert_eq!(analysis.max_amplitude, 1.0);
        assert_eq!(analysis.good_contraction_count, None);
    }

    #[test]
    fn test_rectifies_negative_signal() {
        let signal: Vec<f32> = bursts(3000, &[(1000, 2000)]).iter().map(|x| -x).collect();
        let analysis = detect_contractions(&signal, RATE, &AnalysisConfig::clinical());
        assert_eq!(analysis.contraction_count, 1);
    }

    #[test]
    fn test_short_events_are_dropped() {
        let signal = bursts(3000, &[(500, 530), (1500, 1700)]);
        let analysis = detect_contractions(&signal, RATE, &unsmoothed());
        assert_eq!(analysis.contraction_count, 1);
        assert_eq!(analysis.contractions[0].start_time_ms, 1500.0);
    }

    #[test]
    fn test_close_bursts_merge() {
        let signal = bursts(4000, &[(500, 1000), (1150, 1600), (2500, 3000)]);
        let analysis = detect_contractions(&signal, RATE, &unsmoothed());

        assert_eq!(analysis.contraction_count, 2);
        assert_eq!(analysis.contractions[0].start_time_ms, 500.0);
        assert!((analysis.contractions[0].end_time_ms - 1600.0).abs() < 1e-2);

        let no_merge = AnalysisConfig { merge_threshold_ms: 0, ..unsmoothed() };
        assert_eq!(detect_contractions(&signal, RATE, &no_merge).contraction_count, 3);
    }

    #[test]
    fn test_refractory_period() {
        let signal = bursts(4000, &[(500, 1000), (1150, 1600), (2500, 3000)]);
        let config = AnalysisConfig {
            merge_threshold_ms: 0,
            refractory_period_ms: 300,
            ..unsmoothed()
        };
        let analysis = detect_contractions(&signal, RATE, &config);
        assert_eq!(analysis.contraction_count, 2);
        assert_eq!(analysis.contractions[1].start_time_ms, 2500.0);
    }

    #[test]
    fn test_burst_at_signal_end() {
        let signal = bursts(2000, &[(1500, 2000)]);
        let analysis = detect_contractions(&signal, RATE, &unsmoothed());

        assert_eq!(analysis.contraction_count, 1);
        assert!((analysis.contractions[0].end_time_ms - 1999.0).abs() < 1e-2);
    }

    #[test]
    fn test_mvc_flags_good_contractions() {
        let mut signal = bursts(4000, &[(500, 1000), (2500, 3000)]);
        for value in &mut signal[2500..3000] {
            *value = 0.5;
        }
        let config = AnalysisConfig {
            mvc_amplitude_threshold: Some(0.8),
            ..unsmoothed()
        };
        let analysis = detect_contractions(&signal, RATE, &config);

        assert_eq!(analysis.contraction_count, 2);
        assert_eq!(analysis.good_contraction_count, Some(1));
        assert_eq!(analysis.contractions[0].is_good, Some(true));
        assert_eq!(analysis.contractions[1].is_good, Some(false));
    }

    #[test]
    fn test_degenerate_inputs() {
        let config = AnalysisConfig::clinical();
        assert_eq!(detect_contractions(&[0.5; 10], RATE, &config).contraction_count, 0);
        assert_eq!(detect_contractions(&[0.0; 1000], RATE, &config).contraction_count, 0);

        let with_mvc = AnalysisConfig { mvc_amplitude_threshold: Some(1.0), ..config };
        assert_eq!(detect_contractions(&[], RATE, &with_mvc).good_contraction_count, Some(0));
    }
}
