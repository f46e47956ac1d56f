use serde::{Deserialize, Serialize};

use crate::FeedbackEntry;

/// How past decisions held up once outcomes were reported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomePredictions {
    pub tracked: usize,
    pub correct: usize,
    /// Approved, later unsuccessful.
    pub false_positives: usize,
    /// Turned down, later successful.
    pub false_negatives: usize,
    /// Percent correct; `None` until an outcome is tracked.
    pub accuracy: Option<u8>,
}

/// A decision is correct when approval matched success. Approval means the
/// reviewer did not disagree with the report.
pub fn outcome_predictions(entries: &[FeedbackEntry]) -> OutcomePredictions {
    let mut out = OutcomePredictions::default();
    for entry in entries {
        let Some(outcome) = &entry.outcome_data else {
            continue;
        };
        out.tracked += 1;
        match (entry.overall_agreement.approved(), outcome.status.is_success()) {
            (true, true) | (false, false) => out.correct += 1,
            (true, false) => out.false_positives += 1,
            (false, true) => out.false_negatives += 1,
        }
    }
    if out.tracked > 0 {
        out.accuracy = Some((out.correct as f64 / out.tracked as f64 * 100.0).round() as u8);
    }
    out
}
