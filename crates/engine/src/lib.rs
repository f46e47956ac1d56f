//! Adaptive scoring and calibration engine.
//!
//! Wires the claim and feedback stores to the pure scoring and calibration
//! crates, and adds optional narrative summaries on top.

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::DiligenceEngine;
pub use error::{EngineError, Result};
