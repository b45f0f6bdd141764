//! Game-type and BFR protocol presets over the synthesizer

use crate::options::SynthesizerOptions;
use crate::synthesizer::{generate_with_rng, synthesize_session};
use ghostly_core::{EMGDataPoint, SyntheticSession};
use rand::Rng;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Session length used by every game preset
pub const GAME_SESSION_SECONDS: f32 = 120.0;
pub const GAME_DOWNSAMPLE_FACTOR: usize = 100;

/// GHOSTLY+ exergame driving the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameType {
    /// Maze navigation with obstacles and dead ends
    MazeRun,
    /// Continuous movement, no obstacles
    SpaceGame,
    Other,
}

impl GameType {
    /// Parse a free-form game label; unknown labels map to `Other`
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        if label.contains("maze") {
            GameType::MazeRun
        } else if label.contains("space") {
            GameType::SpaceGame
        } else {
            GameType::Other
        }
    }

    /// Contractions per session when no explicit target is given
    pub fn contraction_range(&self) -> RangeInclusive<usize> {
        match self {
            GameType::MazeRun => 12..=15,
            GameType::SpaceGame => 8..=10,
            GameType::Other => 10..=12,
        }
    }

    pub fn includes_pauses(&self) -> bool {
        !matches!(self, GameType::SpaceGame)
    }

    /// Options for one session; an explicit target always keeps pauses on
    pub fn options<R: Rng + ?Sized>(&self, target: Option<usize>, rng: &mut R) -> SynthesizerOptions {
        let base = SynthesizerOptions {
            duration_seconds: GAME_SESSION_SECONDS,
            downsample_factor: GAME_DOWNSAMPLE_FACTOR,
            ..Default::default()
        };

        match target.filter(|&count| count > 0) {
            Some(count) => base.with_target(count).with_pauses(true),
            None => base
                .with_target(rng.gen_range(self.contraction_range()))
                .with_pauses(self.includes_pauses()),
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, target: Option<usize>, rng: &mut R) -> Vec<EMGDataPoint> {
        let options = self.options(target, rng);
        generate_with_rng(&options, rng)
    }
}

impl FromStr for GameType {
    type Err = std::convert::Infallible;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Ok(GameType::from_label(label))
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameType::MazeRun => write!(f, "Maze Run"),
            GameType::SpaceGame => write!(f, "Space Game"),
            GameType::Other => write!(f, "Other"),
        }
    }
}

/// Game-specific series with ambient randomness
pub fn generate_game_session(label: &str, target: Option<usize>) -> Vec<EMGDataPoint> {
    GameType::from_label(label).generate(target, &mut rand::thread_rng())
}

/// Blood Flow Restriction protocol: fixed sets of gameplay with rests between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BfrProtocol {
    pub sets: u32,
    pub set_seconds: f32,
    pub rest_seconds: f32,
}

impl Default for BfrProtocol {
    fn default() -> Self {
        Self {
            sets: 4,
            set_seconds: 120.0,
            rest_seconds: 120.0,
        }
    }
}

impl BfrProtocol {
    const BASE_CONTRACTIONS: RangeInclusive<usize> = 10..=12;
    const MIN_CONTRACTIONS: usize = 8;

    /// Options for a 1-based set; sets after the second lose one burst each
    pub fn set_options<R: Rng + ?Sized>(&self, set_number: u32, rng: &mut R) -> SynthesizerOptions {
        let mut target = rng.gen_range(Self::BASE_CONTRACTIONS);
        if set_number > 2 {
            let fatigue = (set_number - 2) as usize;
            target = target.saturating_sub(fatigue).max(Self::MIN_CONTRACTIONS);
        }

        SynthesizerOptions {
            duration_seconds: self.set_seconds,
            ..Default::default()
        }
        .with_target(target)
        .with_pauses(true)
    }

    /// One synthetic session per set, in order
    pub fn sessions<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SyntheticSession> {
        (1..=self.sets)
            .map(|set_number| {
                let options = self.set_options(set_number, rng);
                synthesize_session(&options, rng)
            })
            .collect()
    }

    /// Wall-clock length including the rests between sets
    pub fn total_seconds(&self) -> f32 {
        let rests = self.sets.saturating_sub(1) as f32;
        self.sets as f32 * self.set_seconds + rests * self.rest_seconds
    }
}
