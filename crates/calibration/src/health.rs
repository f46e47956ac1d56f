use serde::{Deserialize, Serialize};

use crate::{CalibrationError, DriftSeverity, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLabel {
    Excellent,
    Good,
    NeedsAttention,
    Critical,
}

impl HealthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => HealthLabel::Excellent,
            70..=84 => HealthLabel::Good,
            50..=69 => HealthLabel::NeedsAttention,
            _ => HealthLabel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLabel::Excellent => "excellent",
            HealthLabel::Good => "good",
            HealthLabel::NeedsAttention => "needs_attention",
            HealthLabel::Critical => "critical",
        }
    }
}

/// `0.4 * accuracy + 0.4 * partner agreement + 0.2 * (100 - drift penalty)`,
/// rounded. Inputs are percentages.
pub fn health_score(overall_accuracy: u8, partner_agreement_rate: f64, drift: DriftSeverity) -> Result<u8> {
    let raw = 0.4 * overall_accuracy as f64
        + 0.4 * partner_agreement_rate
        + 0.2 * (100.0 - drift.penalty());
    let score = raw.round();
    if !(0.0..=100.0).contains(&score) {
        return Err(CalibrationError::InvariantViolation(format!(
            "health score {score} outside [0, 100]"
        )));
    }
    Ok(score as u8)
}
