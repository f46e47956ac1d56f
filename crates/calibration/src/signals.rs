use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::FeedbackEntry;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Effectiveness {
    InsufficientData,
    Measured { score: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalEffectiveness {
    pub signal: String,
    pub sample_count: usize,
    pub effectiveness: Effectiveness,
}

/// Ranks how well individual scoring signals predict reviewer judgment.
pub trait SignalRanker: Send + Sync {
    fn rank(&self, entries: &[FeedbackEntry]) -> Vec<SignalEffectiveness>;
}

/// Ranker used until signal-level outcome data exists: lists every
/// feedback dimension seen and reports it as unmeasured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnrankedSignals;

impl SignalRanker for UnrankedSignals {
    fn rank(&self, entries: &[FeedbackEntry]) -> Vec<SignalEffectiveness> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in entries.iter().flat_map(|e| &e.dimension_feedback) {
            *counts.entry(row.dimension.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(signal, sample_count)| SignalEffectiveness {
                signal: signal.to_string(),
                sample_count,
                effectiveness: Effectiveness::InsufficientData,
            })
            .collect()
    }
}
