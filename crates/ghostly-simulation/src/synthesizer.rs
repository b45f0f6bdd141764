//! Bilateral quadriceps EMG synthesizer
//!
//! Pre-computes contraction timings, then walks every internal sample
//! and emits every Nth one as a chart point.

use crate::allocation::{generate_pauses, schedule_contractions, PlacementPlan};
use crate::envelope::ContractionEnvelope;
use crate::options::SynthesizerOptions;
use ghostly_core::{
    ContractionTiming, EMGDataPoint, GhostlyResult, MuscleSide, PausePeriod, SyntheticSession,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use tracing::debug;

/// Resting amplitude of a pre-processed channel
pub const BASELINE_RANGE: (f32, f32) = (0.01, 0.03);
/// Multiplicative sample-to-sample variation during a burst
pub const CONTRACTION_JITTER_RANGE: (f32, f32) = (0.98, 1.02);

/// Seeded generator when requested, ambient entropy otherwise
fn rng_for(options: &SynthesizerOptions) -> StdRng {
    match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generate a chart-ready series; never fails, degenerate options are clamped
pub fn generate(options: &SynthesizerOptions) -> Vec<EMGDataPoint> {
    let mut rng = rng_for(options);
    synthesize_session(options, &mut rng).into_points()
}

/// Generate with a caller-supplied random source
pub fn generate_with_rng<R: Rng + ?Sized>(
    options: &SynthesizerOptions,
    rng: &mut R,
) -> Vec<EMGDataPoint> {
    synthesize_session(options, rng).into_points()
}

/// Full generation pass, keeping the pauses and timings that shaped the series
pub fn synthesize_session<R: Rng + ?Sized>(
    options: &SynthesizerOptions,
    rng: &mut R,
) -> SyntheticSession {
    let options = options.sanitized();
    let layout = options.layout();
    let timing = options.timing();
    let total_samples = layout.total_samples;

    let pauses = if options.include_pauses {
        generate_pauses(total_samples, &timing, rng)
    } else {
        Vec::new()
    };

    let plan = PlacementPlan::build(
        total_samples,
        &timing,
        &pauses,
        options.target_contractions,
        rng,
    );
    let contractions = schedule_contractions(
        &plan,
        options.target_contractions,
        total_samples,
        &timing,
        rng,
    );

    debug!(
        realized = contractions.len(),
        requested = options.target_contractions,
        forced = plan.forced,
        pauses = pauses.len(),
        "contraction timings prepared"
    );

    let points = render_samples(&options, &pauses, &contractions, rng);
    SyntheticSession::new(layout, pauses, contractions, points)
}

/// Walk every internal sample, emitting every `downsample_factor`-th one
fn render_samples<R: Rng + ?Sized>(
    options: &SynthesizerOptions,
    pauses: &[PausePeriod],
    contractions: &[ContractionTiming],
    rng: &mut R,
) -> Vec<EMGDataPoint> {
    let layout = options.layout();
    let envelope = ContractionEnvelope::default();
    let baseline = Uniform::new(BASELINE_RANGE.0, BASELINE_RANGE.1);
    let jitter = Uniform::new(CONTRACTION_JITTER_RANGE.0, CONTRACTION_JITTER_RANGE.1);

    let mut points = Vec::with_capacity(layout.expected_points());

    for sample in 0..layout.total_samples {
        let mut left = baseline.sample(rng);
        let mut right = baseline.sample(rng);

        let suppressed = options.suppress_during_pauses
            && pauses.iter().any(|pause| pause.contains(sample));

        if !suppressed {
            for side in MuscleSide::BOTH {
                // Earliest-starting event on this leg wins
                let Some(active) = contractions
                    .iter()
                    .find(|c| c.side == side && c.contains(sample))
                else {
                    continue;
                };

                let value = active.peak_amplitude
                    * envelope.gain_at(active.progress(sample))
                    * jitter.sample(rng);

                match side {
                    MuscleSide::Left => left = value,
                    MuscleSide::Right => right = value,
                }
            }
        }

        if sample % layout.downsample_factor == 0 {
            points.push(EMGDataPoint {
                time: layout.time_at(sample),
                left_quadriceps: left,
                right_quadriceps: right,
            });
        }
    }

    points
}

/// Stateful synthesizer owning its random source
pub struct SignalSynthesizer<R = StdRng> {
    options: SynthesizerOptions,
    rng: R,
}

impl SignalSynthesizer<StdRng> {
    /// Create a synthesizer after strict validation
    pub fn new(options: SynthesizerOptions) -> GhostlyResult<Self> {
        options.validate()?;
        let rng = rng_for(&options);

        Ok(SignalSynthesizer { options, rng })
    }
}

impl<R: Rng> SignalSynthesizer<R> {
    /// Use an injected random source; options are clamped, not validated
    pub fn with_rng(options: SynthesizerOptions, rng: R) -> Self {
        SignalSynthesizer {
            options: options.sanitized(),
            rng,
        }
    }

    pub fn synthesize(&mut self) -> SyntheticSession {
        synthesize_session(&self.options, &mut self.rng)
    }

    pub fn generate(&mut self) -> Vec<EMGDataPoint> {
        self.synthesize().into_points()
    }

    pub fn options(&self) -> &SynthesizerOptions {
        &self.options
    }

    pub fn update_options(&mut self, options: SynthesizerOptions) -> GhostlyResult<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostly_core::SampleWindow;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn is_baseline(value: f32) -> bool {
        (0.01..=0.03).contains(&value)
    }

    #[test]
    fn test_output_length() {
        for (duration, rate, factor, expected) in [
            (120.0, 1000.0, 100, 1200),
            (60.0, 1000.0, 50, 1200),
            (10.0, 500.0, 7, 715),
            (30.0, 2000.0, 1, 60_000),
        ] {
            for include_pauses in [true, false] {
                let options = SynthesizerOptions {
                    duration_seconds: duration,
                    sampling_rate: rate,
                    downsample_factor: factor,
                    include_pauses,
                    ..Default::default()
                };
                let points = generate_with_rng(&options, &mut seeded(1));
                assert_eq!(points.len(), expected);
            }
        }
    }

    #[test]
    fn test_time_is_monotonic() {
        let points = generate_with_rng(&SynthesizerOptions::default(), &mut seeded(2));

        assert_eq!(points[0].time, 0.0);
        assert!(points.windows(2).all(|pair| pair[1].time > pair[0].time));
        assert!((points[10].time - 1.0).abs() < 1e-6);
        assert!((points[1199].time - 119.9).abs() < 1e-4);
    }

    #[test]
    fn test_time_is_monotonic_on_long_high_rate_sessions() {
        let options = SynthesizerOptions {
            duration_seconds: 1025.0,
            sampling_rate: 10_000.0,
            downsample_factor: 1,
            target_contractions: 0,
            include_pauses: false,
            ..Default::default()
        };
        assert!(options.validate().is_ok());

        let points = render_samples(&options, &[], &[], &mut seeded(12));
        assert_eq!(points.len(), 10_250_000);
        assert!(points.windows(2).all(|pair| pair[1].time > pair[0].time));
        assert_eq!(points[10_240_002].time, 10_240_002.0 / 10_000.0);
    }

    #[test]
    fn test_baseline_outside_contractions() {
        let options = SynthesizerOptions::default().with_seed(3);
        let session = synthesize_session(&options, &mut seeded(3));
        let factor = session.layout.downsample_factor;

        for (index, point) in session.points.iter().enumerate() {
            let sample = index * factor;
            for side in MuscleSide::BOTH {
                let active = session
                    .contractions
                    .iter()
                    .any(|c| c.side == side && c.contains(sample));
                if !active {
                    assert!(is_baseline(point.amplitude(side)));
                }
            }
        }
    }

    #[test]
    fn test_exact_contraction_count() {
        for seed in 0..20 {
            let session = synthesize_session(&SynthesizerOptions::default(), &mut seeded(seed));
            assert_eq!(session.contraction_count(None), 15);

            for (index, first) in session.contractions.iter().enumerate() {
                for second in &session.contractions[index + 1..] {
                    let overlap = first.start < second.end() && second.start < first.end();
                    assert!(!(overlap && first.side == second.side), "seed {}", seed);
                }
            }
        }

        let crowded = SynthesizerOptions::default().with_target(90);
        let session = synthesize_session(&crowded, &mut seeded(4));
        assert_eq!(session.contraction_count(None), 90);
    }

    #[test]
    fn test_guard_bands() {
        for seed in 0..20 {
            for target in [15, 12, 80] {
                let options = SynthesizerOptions::default().with_target(target);
                let session = synthesize_session(&options, &mut seeded(seed));

                for contraction in &session.contractions {
                    assert!(contraction.start >= 5000);
                    assert!(contraction.end() <= 115_000);
                }
            }
        }
    }

    #[test]
    fn test_structure_repeats_but_values_differ() {
        let options = SynthesizerOptions::default();
        let first = synthesize_session(&options, &mut seeded(10));
        let second = synthesize_session(&options, &mut seeded(20));

        assert_eq!(first.len(), second.len());
        assert_eq!(first.contraction_count(None), second.contraction_count(None));
        assert_ne!(first.points, second.points);
    }

    #[test]
    fn test_seed_reproduces_output() {
        let options = SynthesizerOptions::default().with_seed(42);
        assert_eq!(generate(&options), generate(&options));

        let mut synthesizer = SignalSynthesizer::new(options).unwrap();
        let session = synthesizer.synthesize();
        assert_eq!(session.points, generate_with_rng(
            &SynthesizerOptions::default(),
            &mut seeded(42),
        ));
    }

    #[test]
    fn test_envelope_on_rendered_contraction() {
        let options = SynthesizerOptions {
            downsample_factor: 1,
            include_pauses: false,
            target_contractions: 1,
            ..Default::default()
        };
        let session = synthesize_session(&options, &mut seeded(6));
        let contraction = session.contractions[0];
        let channel = session.channel_data(contraction.side);

        let onset = channel[contraction.start];
        let middle = channel[contraction.start + contraction.duration / 2];
        let offset = channel[contraction.end() - 1];

        assert!(onset < 0.05);
        assert!(middle >= contraction.peak_amplitude * 0.98 - 1e-4);
        assert!(middle <= contraction.peak_amplitude * 1.02 + 1e-4);
        assert!(offset < 0.05);
    }

    #[test]
    fn test_contractions_overlap_pauses_by_default() {
        let pause = SampleWindow::new(5000, 115_000);
        let contraction = ContractionTiming {
            start: 20_000,
            duration: 1500,
            side: MuscleSide::Right,
            is_long: true,
            peak_amplitude: 1.0,
        };
        let options = SynthesizerOptions::default();

        let points = render_samples(&options, &[pause], &[contraction], &mut seeded(7));
        let during = points[205];
        assert!(contraction.overlaps(&pause));
        assert!(during.right_quadriceps > 0.5);
        assert!(is_baseline(during.left_quadriceps));
    }

    #[test]
    fn test_both_legs_render_during_overlap() {
        let left = ContractionTiming {
            start: 20_000,
            duration: 1500,
            side: MuscleSide::Left,
            is_long: true,
            peak_amplitude: 1.0,
        };
        let right = ContractionTiming {
            start: 20_400,
            duration: 600,
            side: MuscleSide::Right,
            is_long: false,
            peak_amplitude: 0.7,
        };
        let options = SynthesizerOptions::default();

        let points = render_samples(&options, &[], &[left, right], &mut seeded(13));
        let both = points[207];
        assert!(both.left_quadriceps > 0.9);
        assert!(both.right_quadriceps > 0.6);
    }

    #[test]
    fn test_suppression_flag_holds_baseline_in_pauses() {
        let pause = SampleWindow::new(15_000, 30_000);
        let contraction = ContractionTiming {
            start: 20_000,
            duration: 1500,
            side: MuscleSide::Left,
            is_long: true,
            peak_amplitude: 1.0,
        };
        let options = SynthesizerOptions {
            suppress_during_pauses: true,
            ..Default::default()
        };

        let points = render_samples(&options, &[pause], &[contraction], &mut seeded(8));
        assert!(points.iter().all(|p| is_baseline(p.left_quadriceps)));
        assert!(points.iter().all(|p| is_baseline(p.right_quadriceps)));
    }

    #[test]
    fn test_degenerate_options_do_not_panic() {
        let tiny = SynthesizerOptions {
            duration_seconds: 2.0,
            target_contractions: 5,
            ..Default::default()
        };
        assert_eq!(generate_with_rng(&tiny, &mut seeded(9)).len(), 20);

        let empty = SynthesizerOptions {
            duration_seconds: -10.0,
            downsample_factor: 0,
            ..Default::default()
        };
        assert!(generate_with_rng(&empty, &mut seeded(9)).is_empty());

        let none = SynthesizerOptions::default().with_target(0);
        let session = synthesize_session(&none, &mut seeded(9));
        assert_eq!(session.contraction_count(None), 0);
        assert!(session.points.iter().all(|p| is_baseline(p.left_quadriceps)));
    }

    #[test]
    fn test_strict_constructor() {
        let options = SynthesizerOptions { sampling_rate: 0.0, ..Default::default() };
        assert!(SignalSynthesizer::new(options).is_err());

        let mut synthesizer = SignalSynthesizer::with_rng(SynthesizerOptions::default(), seeded(1));
        assert_eq!(synthesizer.generate().len(), 1200);
        assert!(synthesizer
            .update_options(SynthesizerOptions { downsample_factor: 0, ..Default::default() })
            .is_err());
    }
}
