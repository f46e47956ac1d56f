//! Feedback-driven calibration of the scoring weights.
//!
//! A calibration run takes a window of reviewer feedback and the current
//! dimension weights, measures how well past reports matched reviewer
//! judgment, looks for drift between the older and newer half of the
//! window, and proposes bounded weight nudges. Runs are pure: the caller
//! persists the returned weight set.

mod error;
mod config;
mod feedback;
mod store;
mod accuracy;
mod drift;
mod calibrator;
mod health;
mod alignment;
mod outcomes;
mod signals;
mod report;

pub use error::{CalibrationError, Result};
pub use config::CalibrationConfig;
pub use feedback::{Agreement, DimensionFeedback, FeedbackEntry, OutcomeData, OutcomeStatus};
pub use store::{FeedbackStore, InMemoryFeedbackStore};
pub use accuracy::{
    calibration_buckets, dimension_accuracy, overall_accuracy, prediction_accuracy,
    CalibrationBucket, DimensionAccuracy, PredictionAccuracy, Trend,
};
pub use drift::{detect_drift, DriftReport, DriftSeverity, MIN_DRIFT_ENTRIES};
pub use calibrator::{apply_adjustments, propose_adjustments, sample_confidence, WeightAdjustment};
pub use health::{health_score, HealthLabel};
pub use alignment::{partner_alignment, PartnerAlignment};
pub use outcomes::{outcome_predictions, OutcomePredictions};
pub use signals::{Effectiveness, SignalEffectiveness, SignalRanker, UnrankedSignals};
pub use report::{calibrate, CalibrationInput, CalibrationOutcome, CalibrationReport};
