use chrono::{DateTime, Utc};
use scoring::Dimension;
use serde::{Deserialize, Serialize};

use crate::{CalibrationError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agreement {
    Agree,
    PartiallyAgree,
    Disagree,
}

impl Agreement {
    /// Credit toward agreement rates: 1, 0.5 or 0.
    pub fn credit(&self) -> f64 {
        match self {
            Agreement::Agree => 1.0,
            Agreement::PartiallyAgree => 0.5,
            Agreement::Disagree => 0.0,
        }
    }

    /// The reviewer went along with the report's verdict.
    pub fn approved(&self) -> bool {
        !matches!(self, Agreement::Disagree)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionFeedback {
    pub dimension: Dimension,
    pub ai_score: f64,
    pub partner_score: f64,
}

impl DimensionFeedback {
    pub fn new(dimension: impl Into<Dimension>, ai_score: f64, partner_score: f64) -> Self {
        Self {
            dimension: dimension.into(),
            ai_score,
            partner_score,
        }
    }

    /// Signed gap; positive when the engine scored higher than the reviewer.
    pub fn gap(&self) -> f64 {
        self.ai_score - self.partner_score
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Active,
    Graduated,
    Acquired,
    Struggling,
    Failed,
    Closed,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            OutcomeStatus::Active | OutcomeStatus::Graduated | OutcomeStatus::Acquired
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeData {
    pub status: OutcomeStatus,
    pub reported_at: DateTime<Utc>,
}

/// A reviewer's response to one diligence report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub application_id: String,
    pub report_id: String,
    #[serde(default)]
    pub dimension_feedback: Vec<DimensionFeedback>,
    pub overall_agreement: Agreement,
    #[serde(default)]
    pub outcome_data: Option<OutcomeData>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    /// Mean engine score across the entry's dimensions.
    pub fn mean_ai_score(&self) -> Option<f64> {
        if self.dimension_feedback.is_empty() {
            return None;
        }
        let sum: f64 = self.dimension_feedback.iter().map(|d| d.ai_score).sum();
        Some(sum / self.dimension_feedback.len() as f64)
    }

    /// Scores must be finite and on the 0..=100 scale.
    pub fn validate(&self) -> Result<()> {
        for d in &self.dimension_feedback {
            for (label, v) in [("ai_score", d.ai_score), ("partner_score", d.partner_score)] {
                if !(v.is_finite() && (0.0..=100.0).contains(&v)) {
                    return Err(CalibrationError::InvalidFeedback(format!(
                        "{label} {v} for {} in report {}",
                        d.dimension, self.report_id
                    )));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Returns the entries in chronological order. Ties keep input order.
pub(crate) fn chronological(entries: &[FeedbackEntry]) -> Vec<&FeedbackEntry> {
    let mut sorted: Vec<&FeedbackEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.created_at);
    sorted
}

/// Weighted agreement share in `[0, 1]`. Zero entries give zero.
pub(crate) fn agreement_share(entries: &[&FeedbackEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|e| e.overall_agreement.credit()).sum::<f64>() / entries.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(rows: Vec<DimensionFeedback>) -> FeedbackEntry {
        FeedbackEntry {
            application_id: "app".into(),
            report_id: "r".into(),
            dimension_feedback: rows,
            overall_agreement: Agreement::Agree,
            outcome_data: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn mean_ai_score() {
        let e = entry(vec![
            DimensionFeedback::new("founder", 80.0, 70.0),
            DimensionFeedback::new("market", 60.0, 65.0),
        ]);
        assert_eq!(e.mean_ai_score(), Some(70.0));
        assert_eq!(entry(vec![]).mean_ai_score(), None);
    }

    #[test]
    fn rejects_off_scale_scores() {
        assert!(entry(vec![DimensionFeedback::new("founder", 120.0, 70.0)]).validate().is_err());
        assert!(entry(vec![DimensionFeedback::new("founder", f64::NAN, 70.0)]).validate().is_err());
        assert!(entry(vec![DimensionFeedback::new("founder", 100.0, 0.0)]).validate().is_ok());
    }

    #[test]
    fn success_statuses() {
        assert!(OutcomeStatus::Graduated.is_success());
        assert!(!OutcomeStatus::Struggling.is_success());
        assert!(Agreement::PartiallyAgree.approved());
        assert!(!Agreement::Disagree.approved());
    }
}
