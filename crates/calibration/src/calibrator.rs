use std::collections::BTreeMap;

use scoring::weights::clamp_weight;
use scoring::{Dimension, WeightSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::feedback::mean;
use crate::{CalibrationConfig, FeedbackEntry, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightAdjustment {
    pub dimension: Dimension,
    pub current_weight: f64,
    /// Already clamped to the weight range.
    pub recommended_weight: f64,
    pub avg_gap: f64,
    pub sample_count: usize,
    /// `min(1, sample_count / full_confidence_samples)`
    pub confidence: f64,
    pub applied: bool,
    pub reason: String,
}

/// Confidence in an adjustment backed by `samples` feedback rows.
pub fn sample_confidence(samples: usize, full_confidence_samples: usize) -> f64 {
    if full_confidence_samples == 0 {
        return 1.0;
    }
    (samples as f64 / full_confidence_samples as f64).min(1.0)
}

/// Proposes a nudge per dimension from the mean signed gap between engine
/// and reviewer scores. Engine over-scoring lowers the weight.
///
/// Nothing is proposed while the window holds fewer than
/// `config.min_sample_size` entries.
pub fn propose_adjustments(
    entries: &[FeedbackEntry],
    current: &WeightSet,
    config: &CalibrationConfig,
) -> Vec<WeightAdjustment> {
    if entries.len() < config.min_sample_size {
        debug!(
            entries = entries.len(),
            min = config.min_sample_size,
            "not enough feedback to calibrate"
        );
        return Vec::new();
    }

    let mut gaps: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for entry in entries {
        for row in &entry.dimension_feedback {
            gaps.entry(row.dimension.as_str()).or_default().push(row.gap());
        }
    }

    gaps.into_iter()
        .filter(|(_, rows)| rows.len() >= config.min_dimension_samples)
        .filter_map(|(dim, rows)| {
            let avg_gap = mean(&rows);
            if avg_gap.abs() < config.min_gap {
                return None;
            }

            let current_weight = current.get(dim);
            let step = -avg_gap.signum() * config.learning_rate * (avg_gap.abs() / 100.0);
            let recommended_weight = clamp_weight(current_weight + step);
            let confidence = sample_confidence(rows.len(), config.full_confidence_samples);
            let applied = confidence >= config.apply_confidence;

            let direction = if avg_gap > 0.0 { "above" } else { "below" };
            let reason = format!(
                "engine scores {dim} {:.1} points {direction} reviewers on average",
                avg_gap.abs()
            );
            if !applied {
                warn!(dimension = dim, samples = rows.len(), confidence, "adjustment held back");
            }

            Some(WeightAdjustment {
                dimension: dim.to_string(),
                current_weight,
                recommended_weight,
                avg_gap,
                sample_count: rows.len(),
                confidence,
                applied,
                reason,
            })
        })
        .collect()
}

/// Successor weight set from the applied adjustments; `None` when nothing
/// was applied. Weights are validated, not clamped, here.
pub fn apply_adjustments(
    current: &WeightSet,
    adjustments: &[WeightAdjustment],
) -> Result<Option<WeightSet>> {
    let updates: Vec<(Dimension, f64)> = adjustments
        .iter()
        .filter(|a| a.applied)
        .map(|a| (a.dimension.clone(), a.recommended_weight))
        .collect();

    if updates.is_empty() {
        return Ok(None);
    }
    Ok(Some(current.with_updates(updates)?))
}
