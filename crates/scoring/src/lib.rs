//! Deterministic claim-to-score aggregation for diligence reports.
//!
//! Claims are grouped into category scores, rolled up into a 0-100 score and
//! letter grade, and checked against the red-flag rules to reach an
//! investment recommendation. Nothing here performs I/O.

pub mod primitives;
pub mod weights;

mod category;
mod error;
mod flags;
mod overall;
mod recommendation;
mod report;

pub use category::{aggregate_categories, CategoryScore};
pub use error::{Result, ScoringError};
pub use flags::{generate_red_flags, FlagCounts, FlagSeverity, FlagSource, RedFlag};
pub use overall::{overall_score, Grade};
pub use recommendation::{recommend, Recommendation};
pub use report::{build_report, DiligenceReport, Narrative, NarrativeSource, ReportId};
pub use weights::{CategoryDimensionMap, CategoryWeights, Dimension, ScoringWeights, WeightSet};
