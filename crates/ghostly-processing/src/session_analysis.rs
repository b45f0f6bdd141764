//! Per-channel analytics over a synthetic session

use crate::config::AnalysisConfig;
use crate::contractions::{detect_contractions, ContractionAnalysis};
use crate::features::AmplitudeMetrics;
use ghostly_core::{GhostlyError, GhostlyResult, MuscleSide, SyntheticSession};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Analytics for one quadriceps channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    pub side: MuscleSide,
    pub amplitude: AmplitudeMetrics,
    pub contractions: ContractionAnalysis,
}

/// Analytics for both channels of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    /// Rate of the analyzed points in Hz
    pub sampling_rate: f32,
    pub left: ChannelAnalysis,
    pub right: ChannelAnalysis,
}

impl SessionAnalysis {
    pub fn channel(&self, side: MuscleSide) -> &ChannelAnalysis {
        match side {
            MuscleSide::Left => &self.left,
            MuscleSide::Right => &self.right,
        }
    }

    pub fn total_contractions(&self) -> usize {
        self.left.contractions.contraction_count + self.right.contractions.contraction_count
    }
}

/// Analyze the emitted points of a session at their emitted rate
pub fn analyze_session(session: &SyntheticSession, config: &AnalysisConfig) -> GhostlyResult<SessionAnalysis> {
    config.validate()?;
    if session.is_empty() {
        return Err(GhostlyError::EmptySignal);
    }

    let sampling_rate = session.layout.emitted_rate();
    let analyze = |side: MuscleSide| {
        let signal = session.channel_data(side);
        let channel = ChannelAnalysis {
            side,
            amplitude: AmplitudeMetrics::calculate(&signal),
            contractions: detect_contractions(&signal, sampling_rate, config),
        };
        debug!(
            %side,
            detected = channel.contractions.contraction_count,
            realized = session.contraction_count(Some(side)),
            "channel analyzed"
        );
        channel
    };

    Ok(SessionAnalysis {
        sampling_rate,
        left: analyze(MuscleSide::Left),
        right: analyze(MuscleSide::Right),
    })
}
