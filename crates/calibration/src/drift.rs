use std::collections::{BTreeMap, BTreeSet};

use scoring::Dimension;
use serde::{Deserialize, Serialize};

use crate::feedback::{agreement_share, chronological, mean};
use crate::FeedbackEntry;

pub const MIN_DRIFT_ENTRIES: usize = 4;

const SCORE_SHIFT_DETECT: f64 = 8.0;
const SCORE_SHIFT_MODERATE: f64 = 10.0;
const SCORE_SHIFT_SEVERE: f64 = 15.0;
const DIMENSION_GAP_SHIFT: f64 = 10.0;
const CONFIDENCE_SHIFT_DETECT: f64 = 0.15;
const SEVERE_AFFECTED_DIMENSIONS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftSeverity {
    None,
    Minor,
    Moderate,
    Severe,
}

impl DriftSeverity {
    /// Points taken off the health score.
    pub fn penalty(&self) -> f64 {
        match self {
            DriftSeverity::None => 0.0,
            DriftSeverity::Minor => 5.0,
            DriftSeverity::Moderate => 15.0,
            DriftSeverity::Severe => 30.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriftSeverity::None => "none",
            DriftSeverity::Minor => "minor",
            DriftSeverity::Moderate => "moderate",
            DriftSeverity::Severe => "severe",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub detected: bool,
    pub severity: DriftSeverity,
    /// Absolute change of the mean engine score between halves.
    pub score_shift: f64,
    /// Change of the agreement share (second minus first), in `[-1, 1]`.
    pub confidence_shift: f64,
    pub affected_dimensions: Vec<Dimension>,
    pub first_period_entries: usize,
    pub second_period_entries: usize,
}

impl DriftReport {
    fn not_enough_data(len: usize) -> Self {
        Self {
            detected: false,
            severity: DriftSeverity::None,
            score_shift: 0.0,
            confidence_shift: 0.0,
            affected_dimensions: Vec::new(),
            first_period_entries: len,
            second_period_entries: 0,
        }
    }
}

fn mean_ai_score(half: &[&FeedbackEntry]) -> f64 {
    let scores: Vec<f64> = half
        .iter()
        .flat_map(|e| e.dimension_feedback.iter().map(|d| d.ai_score))
        .collect();
    mean(&scores)
}

fn mean_gaps<'a>(half: &[&'a FeedbackEntry]) -> BTreeMap<&'a str, f64> {
    let mut rows: BTreeMap<&'a str, Vec<f64>> = BTreeMap::new();
    for entry in half {
        for d in &entry.dimension_feedback {
            rows.entry(d.dimension.as_str()).or_default().push(d.gap().abs());
        }
    }
    rows.into_iter().map(|(k, v)| (k, mean(&v))).collect()
}

/// Compares the older and newer halves of the window.
///
/// Fewer than [`MIN_DRIFT_ENTRIES`] entries never report drift. A dimension
/// is only compared when it has rows in both halves.
pub fn detect_drift(entries: &[FeedbackEntry]) -> DriftReport {
    if entries.len() < MIN_DRIFT_ENTRIES {
        return DriftReport::not_enough_data(entries.len());
    }

    let ordered = chronological(entries);
    let (first, second) = ordered.split_at(ordered.len() / 2);

    let score_shift = (mean_ai_score(second) - mean_ai_score(first)).abs();

    let first_gaps = mean_gaps(first);
    let second_gaps = mean_gaps(second);
    let affected: BTreeSet<&str> = first_gaps
        .iter()
        .filter_map(|(dim, before)| {
            let after = second_gaps.get(dim)?;
            ((after - before).abs() > DIMENSION_GAP_SHIFT).then_some(*dim)
        })
        .collect();

    let confidence_shift = agreement_share(second) - agreement_share(first);

    let detected = score_shift > SCORE_SHIFT_DETECT
        || affected.len() > 1
        || confidence_shift.abs() > CONFIDENCE_SHIFT_DETECT;

    let severity = if !detected {
        DriftSeverity::None
    } else if score_shift > SCORE_SHIFT_SEVERE || affected.len() >= SEVERE_AFFECTED_DIMENSIONS {
        DriftSeverity::Severe
    } else if score_shift > SCORE_SHIFT_MODERATE {
        DriftSeverity::Moderate
    } else {
        DriftSeverity::Minor
    };

    DriftReport {
        detected,
        severity,
        score_shift,
        confidence_shift,
        affected_dimensions: affected.into_iter().map(str::to_string).collect(),
        first_period_entries: first.len(),
        second_period_entries: second.len(),
    }
}
