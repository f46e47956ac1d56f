use std::collections::BTreeMap;

use scoring::Dimension;
use serde::{Deserialize, Serialize};

use crate::feedback::mean;
use crate::{Agreement, FeedbackEntry};

/// Mean signed gap beyond which a dimension counts as systematically biased.
const BIAS_GAP: f64 = 5.0;
const BIAS_MIN_ROWS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerAlignment {
    /// Percent of entries where the reviewer fully agreed.
    pub agreement_rate: f64,
    pub partial_rate: f64,
    pub disagreement_rate: f64,
    /// Mean `|ai - partner|` over every dimension row.
    pub mean_absolute_gap: f64,
    /// Engine scores these higher than reviewers do.
    pub overscored_dimensions: Vec<Dimension>,
    pub underscored_dimensions: Vec<Dimension>,
}

pub fn partner_alignment(entries: &[FeedbackEntry]) -> PartnerAlignment {
    if entries.is_empty() {
        return PartnerAlignment::default();
    }

    let total = entries.len() as f64;
    let share = |a: Agreement| {
        entries.iter().filter(|e| e.overall_agreement == a).count() as f64 / total * 100.0
    };

    let mut signed: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut absolute = Vec::new();
    for row in entries.iter().flat_map(|e| &e.dimension_feedback) {
        signed.entry(row.dimension.as_str()).or_default().push(row.gap());
        absolute.push(row.gap().abs());
    }

    let mut overscored = Vec::new();
    let mut underscored = Vec::new();
    for (dim, gaps) in signed.into_iter().filter(|(_, g)| g.len() >= BIAS_MIN_ROWS) {
        let avg = mean(&gaps);
        if avg > BIAS_GAP {
            overscored.push(dim.to_string());
        } else if avg < -BIAS_GAP {
            underscored.push(dim.to_string());
        }
    }

    PartnerAlignment {
        agreement_rate: share(Agreement::Agree),
        partial_rate: share(Agreement::PartiallyAgree),
        disagreement_rate: share(Agreement::Disagree),
        mean_absolute_gap: mean(&absolute),
        overscored_dimensions: overscored,
        underscored_dimensions: underscored,
    }
}
