//! Pause windows, candidate slots and contraction placement
//!
//! Both placement paths feed the same strategy: a list of candidate
//! windows is thinned to the target count with evenly spaced, jittered
//! picks, then one burst is scheduled inside each chosen window. When
//! obstacles leave too few slots, the candidates become forced anchors
//! walked across the whole usable timeline instead.

use crate::options::SynthesisTiming;
use ghostly_core::{ContractionTiming, MuscleSide, PausePeriod, SampleWindow};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

/// Probability that a burst switches to the other leg
pub const SIDE_ALTERNATION_PROBABILITY: f32 = 0.75;
/// Slot pick jitter, as a fraction of the ideal spacing
pub const SLOT_SELECTION_JITTER: f32 = 0.3;
/// Anchor spacing jitter for forced placement
pub const FORCED_SPACING_JITTER: f32 = 0.4;
pub const SLOT_LENGTH_ALTERNATION: f32 = 0.8;
pub const FORCED_LENGTH_ALTERNATION: f32 = 0.85;

const LONG_PEAK_RANGE: (f32, f32) = (0.9, 1.2);
const SHORT_PEAK_RANGE: (f32, f32) = (0.6, 0.8);

/// Uniform draw in `[min, max)`, collapsing to `min` for empty ranges
fn draw_samples<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Usable timeline between the two guard bands
pub fn usable_bounds(total_samples: usize, timing: &SynthesisTiming) -> SampleWindow {
    SampleWindow::new(timing.guard_band, total_samples.saturating_sub(timing.guard_band))
}

/// Place 2-3 obstacle windows roughly evenly across the recording
pub fn generate_pauses<R: Rng + ?Sized>(
    total_samples: usize,
    timing: &SynthesisTiming,
    rng: &mut R,
) -> Vec<PausePeriod> {
    let count = rng.gen_range(2..=3usize);
    let spacing = (total_samples / (count + 1)) as i64;
    let lower = timing.guard_band as i64;
    let upper = total_samples as i64 - timing.guard_band as i64;
    let jitter = timing.pause_jitter as i64;

    (0..count)
        .filter_map(|index| {
            let offset = draw_samples(rng, 0, timing.pause_jitter * 2) as i64 - jitter;
            let nominal = (index as i64 + 1) * spacing + offset;
            let length = draw_samples(rng, timing.pause_min, timing.pause_max) as i64;

            let start = nominal.max(lower);
            let end = (nominal + length).min(upper);
            (start < end).then(|| SampleWindow::new(start as usize, end as usize))
        })
        .collect()
}

/// Fixed-length slots at a fixed stride that avoid every pause
pub fn candidate_slots(
    total_samples: usize,
    timing: &SynthesisTiming,
    pauses: &[PausePeriod],
) -> Vec<SampleWindow> {
    let bounds = usable_bounds(total_samples, timing);

    (bounds.start..bounds.end)
        .step_by(timing.slot_stride)
        .map(|start| SampleWindow::new(start, start + timing.slot_length))
        .filter(|slot| slot.end < bounds.end)
        .filter(|slot| !pauses.iter().any(|pause| slot.intersects(pause)))
        .collect()
}

/// Exactly `target` anchors walked across the usable timeline, ignoring pauses
pub fn forced_anchors<R: Rng + ?Sized>(
    total_samples: usize,
    timing: &SynthesisTiming,
    target: usize,
    rng: &mut R,
) -> Vec<SampleWindow> {
    if target == 0 {
        return Vec::new();
    }

    let lower = timing.guard_band as f32;
    let upper = total_samples.saturating_sub(timing.guard_band) as f32;
    let step = ((upper - lower) / target as f32).max(0.0);
    let mut current = lower;

    (0..target)
        .map(|_| {
            let variation = (rng.gen::<f32>() - 0.5) * step * 2.0 * FORCED_SPACING_JITTER;
            let position = (current + step + variation).min(upper).max(lower);
            current = position;

            let anchor = position as usize;
            SampleWindow::new(anchor, anchor)
        })
        .collect()
}

/// Pick `target` distinct indices out of `candidate_count`, evenly spaced with jitter
///
/// Collisions after flooring are backfilled from unused indices, so the
/// result holds `min(target, candidate_count)` sorted indices.
pub fn select_windows<R: Rng + ?Sized>(
    candidate_count: usize,
    target: usize,
    jitter: f32,
    rng: &mut R,
) -> Vec<usize> {
    if candidate_count == 0 || target == 0 {
        return Vec::new();
    }

    let spacing = candidate_count as f32 / target as f32;
    let last_index = (candidate_count - 1) as f32;

    let mut selected: Vec<usize> = (0..target)
        .map(|band| {
            let base = band as f32 * spacing;
            let variation = (rng.gen::<f32>() - 0.5) * spacing * 2.0 * jitter;
            (base + variation).max(0.0).min(last_index).floor() as usize
        })
        .collect();

    selected.sort_unstable();
    selected.dedup();

    while selected.len() < target {
        let unused: Vec<usize> = (0..candidate_count)
            .filter(|index| selected.binary_search(index).is_err())
            .collect();

        let Some(&pick) = unused.choose(rng) else {
            break;
        };
        if let Err(position) = selected.binary_search(&pick) {
            selected.insert(position, pick);
        }
    }

    selected.truncate(target);
    selected
}

/// Candidate windows plus the knobs of the path that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub windows: Vec<SampleWindow>,
    pub selection_jitter: f32,
    /// Chance of flipping long/short after each burst
    pub length_alternation: f32,
    /// True when obstacles consumed too much timeline
    pub forced: bool,
}

impl PlacementPlan {
    /// Choose between pause-filtered slots and forced anchors
    pub fn build<R: Rng + ?Sized>(
        total_samples: usize,
        timing: &SynthesisTiming,
        pauses: &[PausePeriod],
        target: usize,
        rng: &mut R,
    ) -> Self {
        let slots = candidate_slots(total_samples, timing, pauses);
        debug!(slots = slots.len(), target, "candidate contraction slots");

        if slots.len() >= target {
            return PlacementPlan {
                windows: slots,
                selection_jitter: SLOT_SELECTION_JITTER,
                length_alternation: SLOT_LENGTH_ALTERNATION,
                forced: false,
            };
        }

        warn!(
            slots = slots.len(),
            target,
            "not enough free slots, forcing contractions across the timeline"
        );

        PlacementPlan {
            windows: forced_anchors(total_samples, timing, target, rng),
            selection_jitter: SLOT_SELECTION_JITTER,
            length_alternation: FORCED_LENGTH_ALTERNATION,
            forced: true,
        }
    }
}

/// Clip a burst so it lies fully inside `bounds`
fn fit_within(start: usize, duration: usize, bounds: &SampleWindow) -> (usize, usize) {
    let duration = duration.min(bounds.len());
    let start = start
        .max(bounds.start)
        .min(bounds.end.saturating_sub(duration));
    (start, duration)
}

/// Latest end among bursts on `side` that overlap `[start, start + duration)`
fn clash_end(placed: &[ContractionTiming], side: MuscleSide, start: usize, duration: usize) -> Option<usize> {
    placed
        .iter()
        .filter(|c| c.side == side && c.start < start + duration && start < c.end())
        .map(|c| c.end())
        .max()
}

/// Move a burst off earlier bursts on the same leg
///
/// Keeps the drawn placement when it is free, then tries the other leg,
/// then pushes the start past the clashing bursts on either leg. When the
/// usable timeline is too crowded for any of these, the overlap stays.
fn resolve_clash(
    placed: &[ContractionTiming],
    side: MuscleSide,
    start: usize,
    duration: usize,
    bounds: &SampleWindow,
) -> (MuscleSide, usize) {
    for candidate_side in [side, side.opposite()] {
        if clash_end(placed, candidate_side, start, duration).is_none() {
            return (candidate_side, start);
        }
    }

    for candidate_side in [side, side.opposite()] {
        let mut candidate = start;
        while let Some(end) = clash_end(placed, candidate_side, candidate, duration) {
            candidate = end;
        }
        if candidate + duration <= bounds.end {
            return (candidate_side, candidate);
        }
    }

    (side, start)
}

/// Schedule one burst in each selected window, sorted by start
pub fn schedule_contractions<R: Rng + ?Sized>(
    plan: &PlacementPlan,
    target: usize,
    total_samples: usize,
    timing: &SynthesisTiming,
    rng: &mut R,
) -> Vec<ContractionTiming> {
    let bounds = usable_bounds(total_samples, timing);
    let chosen = select_windows(plan.windows.len(), target, plan.selection_jitter, rng);

    let mut is_long = true;
    let mut last_side = MuscleSide::Left;
    let mut contractions = Vec::with_capacity(chosen.len());

    for index in chosen {
        let window = plan.windows[index];

        let preferred = if rng.gen::<f32>() < SIDE_ALTERNATION_PROBABILITY {
            last_side.opposite()
        } else if rng.gen_bool(0.5) {
            MuscleSide::Left
        } else {
            MuscleSide::Right
        };

        let duration = if is_long {
            draw_samples(rng, timing.long_min, timing.long_max)
        } else {
            draw_samples(rng, timing.short_min, timing.short_max)
        };

        let latest = window.start.max(window.end.saturating_sub(duration));
        let room = timing.min_placement_room.max(latest - window.start);
        let offset = (rng.gen::<f32>() * room as f32) as usize;
        let (start, duration) = fit_within(window.start + offset, duration, &bounds);
        let (side, start) = resolve_clash(&contractions, preferred, start, duration, &bounds);
        last_side = side;

        let (low, high) = if is_long { LONG_PEAK_RANGE } else { SHORT_PEAK_RANGE };
        let peak_amplitude = rng.gen_range(low..high);

        contractions.push(ContractionTiming {
            start,
            duration,
            side,
            is_long,
            peak_amplitude,
        });

        if rng.gen::<f32>() < plan.length_alternation {
            is_long = !is_long;
        }
    }

    contractions.sort_by_key(|contraction| contraction.start);
    contractions
}
