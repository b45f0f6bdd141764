//! GHOSTLY-Core: Foundation types for synthetic rehabilitation EMG
//!
//! Bilateral quadriceps samples, contraction and pause timings, and the
//! session container produced by the synthesizer.

pub mod emg_types;
pub mod error;
pub mod session;

pub use emg_types::*;
pub use error::{GhostlyError, GhostlyResult};
pub use session::*;
