//! Optional prose for diligence and calibration reports.
//!
//! The generator is a black box: its output is parsed best-effort and any
//! failure falls back to the deterministic template text the caller passes
//! in. Numbers in reports never depend on it.

mod provider;
mod provider_lmstudio;
mod extract;
mod narrate;

pub use provider::{Findings, FindingsKind, NarrativeGenerator, ProviderInfo};
pub use provider_lmstudio::LmStudioNarrator;
pub use extract::extract_summary;
pub use narrate::{narrate, DEFAULT_TIMEOUT};
