//! GHOSTLY-Processing: contraction analytics for quadriceps EMG
//!
//! Threshold-based burst detection on a smoothed, rectified signal,
//! plus amplitude metrics, applied per channel of a session.

pub mod config;
pub mod contractions;
pub mod features;
pub mod session_analysis;
pub mod smoothing;

pub use config::AnalysisConfig;
pub use contractions::{detect_contractions, ContractionAnalysis, DetectedContraction};
pub use features::AmplitudeMetrics;
pub use session_analysis::{analyze_session, ChannelAnalysis, SessionAnalysis};
pub use smoothing::{moving_average_same, rectify};
