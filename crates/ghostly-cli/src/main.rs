//! ghostly-sim - synthetic GHOSTLY+ session generator
//!
//! Generates bilateral quadriceps EMG for a game preset, a BFR set, or a
//! TOML options file and writes it as CSV or JSON. With `--analyze` the
//! generated session is run through contraction detection and a summary
//! is logged.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use ghostly_core::{MuscleSide, SyntheticSession};
use ghostly_processing::{analyze_session, AnalysisConfig};
use ghostly_simulation::{synthesize_session, GameType, SynthesizerOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;
mod settings;

use output::{write_session, OutputFormat};
use settings::{load_options, resolve_options, Overrides, Preset};

/// Command-line arguments for ghostly-sim
#[derive(Parser, Debug)]
#[command(name = "ghostly-sim")]
#[command(about = "Synthetic bilateral quadriceps EMG for GHOSTLY+ sessions")]
#[command(version)]
struct Args {
    /// Game label ("maze", "space", anything else)
    #[arg(short, long, conflicts_with = "bfr_set")]
    game: Option<String>,

    /// Set number of the 4-set BFR protocol
    #[arg(long)]
    bfr_set: Option<u32>,

    /// TOML file with synthesizer options
    #[arg(short, long, env = "GHOSTLY_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Contraction bursts to place
    #[arg(short = 'n', long)]
    contractions: Option<usize>,

    /// Session length in seconds
    #[arg(short, long)]
    duration: Option<f32>,

    /// Emit every Nth internal sample
    #[arg(long)]
    downsample: Option<usize>,

    /// Do not carve obstacle windows
    #[arg(long)]
    no_pauses: bool,

    /// Hold both channels at baseline inside obstacle windows
    #[arg(long)]
    suppress_pauses: bool,

    /// Random seed for reproducible sessions
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log a contraction analysis of the generated session
    #[arg(short, long)]
    analyze: bool,

    /// Peak amplitude a detected contraction must reach to count as good
    #[arg(long, requires = "analyze")]
    mvc_threshold: Option<f32>,
}

impl Args {
    fn preset(&self) -> Option<Preset> {
        match (&self.game, self.bfr_set) {
            (Some(label), _) => Some(Preset::Game(GameType::from_label(label))),
            (None, Some(set)) => Some(Preset::BfrSet(set)),
            (None, None) => None,
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            contractions: self.contractions,
            duration_seconds: self.duration,
            downsample_factor: self.downsample,
            no_pauses: self.no_pauses,
            suppress_during_pauses: self.suppress_pauses,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so CSV/JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghostly=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => load_options(path)?,
        None => SynthesizerOptions::default(),
    };

    let overrides = args.overrides();
    let mut rng = match overrides.seed.or(base.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let options = resolve_options(base, args.preset(), &overrides, &mut rng)?;
    info!(
        duration = options.duration_seconds,
        rate = options.sampling_rate,
        target = options.target_contractions,
        pauses = options.include_pauses,
        "Generating session"
    );

    let session = synthesize_session(&options, &mut rng);
    log_session(&session);

    if args.analyze {
        analyze(&session, args.mvc_threshold)?;
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_session(&session, args.format, &mut writer)?;

    if let Some(path) = &args.output {
        info!("Wrote {} points to {}", session.len(), path.display());
    }

    Ok(())
}

fn log_session(session: &SyntheticSession) {
    let created = Utc
        .timestamp_millis_opt(session.created_at as i64)
        .single()
        .map(|time| time.to_rfc3339())
        .unwrap_or_default();

    info!(
        id = %session.id,
        created = %created,
        points = session.len(),
        pauses = session.pauses.len(),
        contractions = session.contraction_count(None),
        "Session generated"
    );
}

fn analyze(session: &SyntheticSession, mvc_threshold: Option<f32>) -> Result<()> {
    let config = AnalysisConfig {
        mvc_amplitude_threshold: mvc_threshold,
        ..AnalysisConfig::for_rate(session.layout.emitted_rate())
    };
    let analysis = analyze_session(session, &config).context("Contraction analysis failed")?;

    for side in MuscleSide::BOTH {
        let channel = analysis.channel(side);
        info!(
            %side,
            realized = session.contraction_count(Some(side)),
            detected = channel.contractions.contraction_count,
            good = ?channel.contractions.good_contraction_count,
            avg_duration_ms = channel.contractions.avg_duration_ms,
            max_amplitude = channel.contractions.max_amplitude,
            rms = channel.amplitude.rms,
            "Channel analysis"
        );
    }

    Ok(())
}
