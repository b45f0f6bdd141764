//! GHOSTLY-Simulation: synthetic bilateral EMG for exergame sessions
//!
//! Procedurally places contraction bursts around in-game obstacles and
//! renders the left/right quadriceps time series the dashboards plot.

pub mod allocation;
pub mod envelope;
pub mod options;
pub mod presets;
pub mod synthesizer;

pub use envelope::*;
pub use options::*;
pub use presets::*;
pub use synthesizer::*;
