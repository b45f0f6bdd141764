//! Option resolution: config file, then preset, then explicit flags

use anyhow::{bail, Context, Result};
use ghostly_simulation::{BfrProtocol, GameType, SynthesizerOptions};
use rand::Rng;
use std::path::Path;

/// Session shape chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preset {
    Game(GameType),
    /// 1-based set of the default BFR protocol
    BfrSet(u32),
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub contractions: Option<usize>,
    pub duration_seconds: Option<f32>,
    pub downsample_factor: Option<usize>,
    pub no_pauses: bool,
    pub suppress_during_pauses: bool,
    pub seed: Option<u64>,
}

pub fn load_options(path: &Path) -> Result<SynthesizerOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_options(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn parse_options(text: &str) -> Result<SynthesizerOptions> {
    Ok(toml::from_str(text)?)
}

/// Copy the preset's session shape over `base`, keeping its rate and flags
fn apply_preset<R: Rng + ?Sized>(
    base: SynthesizerOptions,
    preset: Preset,
    contractions: Option<usize>,
    rng: &mut R,
) -> Result<SynthesizerOptions> {
    let shaped = match preset {
        Preset::Game(game) => game.options(contractions, rng),
        Preset::BfrSet(set) => {
            let protocol = BfrProtocol::default();
            if set == 0 || set > protocol.sets {
                bail!("BFR set must be between 1 and {}, got {}", protocol.sets, set);
            }
            protocol.set_options(set, rng)
        }
    };

    Ok(SynthesizerOptions {
        duration_seconds: shaped.duration_seconds,
        downsample_factor: shaped.downsample_factor,
        target_contractions: shaped.target_contractions,
        include_pauses: shaped.include_pauses,
        ..base
    })
}

pub fn resolve_options<R: Rng + ?Sized>(
    base: SynthesizerOptions,
    preset: Option<Preset>,
    overrides: &Overrides,
    rng: &mut R,
) -> Result<SynthesizerOptions> {
    let mut options = match preset {
        Some(preset) => apply_preset(base, preset, overrides.contractions, rng)?,
        None => base,
    };

    // A zero count under a preset means "use the preset range"
    if let Some(count) = overrides.contractions.filter(|&count| count > 0 || preset.is_none()) {
        options.target_contractions = count;
    }
    if let Some(seconds) = overrides.duration_seconds {
        options.duration_seconds = seconds;
    }
    if let Some(factor) = overrides.downsample_factor {
        options.downsample_factor = factor;
    }
    if overrides.no_pauses {
        options.include_pauses = false;
    }
    if overrides.suppress_during_pauses {
        options.suppress_during_pauses = true;
    }
    if let Some(seed) = overrides.seed {
        options.seed = Some(seed);
    }

    options.validate().context("Invalid synthesizer options")?;
    Ok(options)
}
