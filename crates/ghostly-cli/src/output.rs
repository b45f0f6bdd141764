//! Session serialization for the command line

use anyhow::{Context, Result};
use clap::ValueEnum;
use ghostly_core::{EMGDataPoint, SyntheticSession};
use std::io::Write;

/// Header matching the chart consumer's keys
pub const CSV_HEADER: &str = "time,leftQuadriceps,rightQuadriceps";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One row per emitted point
    #[default]
    Csv,
    /// Whole session including pauses and contraction timings
    Json,
}

pub fn write_csv<W: Write>(points: &[EMGDataPoint], writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for point in points {
        writeln!(
            writer,
            "{},{:.6},{:.6}",
            point.time, point.left_quadriceps, point.right_quadriceps
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(session: &SyntheticSession, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, session).context("Failed to serialize session")?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_session<W: Write>(session: &SyntheticSession, format: OutputFormat, writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(&session.points, writer),
        OutputFormat::Json => write_json(session, writer),
    }?;
    writer.flush().context("Failed to flush output")
}
