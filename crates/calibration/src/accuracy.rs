use std::collections::BTreeMap;

use scoring::Dimension;
use serde::{Deserialize, Serialize};

use crate::feedback::{chronological, mean};
use crate::{Agreement, FeedbackEntry};

/// Mean-gap change (points) before a trend counts as moving.
const TREND_THRESHOLD: f64 = 2.0;
const BUCKET_WIDTH: f64 = 20.0;
const BUCKETS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionAccuracy {
    pub dimension: Dimension,
    /// `round(max(0, 100 - avg_gap))`
    pub accuracy: u8,
    /// Mean absolute gap between engine and reviewer.
    pub avg_gap: f64,
    pub sample_count: usize,
    pub trend: Trend,
}

/// One reliability-diagram bin over the engine's mean score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBucket {
    pub lower: u8,
    pub upper: u8,
    /// Bucket midpoint.
    pub predicted: f64,
    /// Observed agreement rate in percent; 0 for an empty bucket.
    pub actual: f64,
    pub sample_count: usize,
    /// `|predicted - actual|`; 0 for an empty bucket.
    pub calibration_error: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionAccuracy {
    /// Percent, partial agreement counted as half.
    pub overall: u8,
    pub sample_size: usize,
    pub dimensions: Vec<DimensionAccuracy>,
    pub calibration_buckets: Vec<CalibrationBucket>,
}

/// `round((agree + 0.5 * partial) / total * 100)`; zero entries give 0.
pub fn overall_accuracy(entries: &[FeedbackEntry]) -> u8 {
    if entries.is_empty() {
        return 0;
    }
    let (agree, partial) = entries.iter().fold((0usize, 0usize), |(a, p), e| {
        match e.overall_agreement {
            Agreement::Agree => (a + 1, p),
            Agreement::PartiallyAgree => (a, p + 1),
            Agreement::Disagree => (a, p),
        }
    });
    let pct = (agree as f64 + 0.5 * partial as f64) / entries.len() as f64 * 100.0;
    pct.round() as u8
}

fn trend_of(gaps: &[f64]) -> Trend {
    if gaps.len() < 2 {
        return Trend::Stable;
    }
    let (first, second) = gaps.split_at(gaps.len() / 2);
    let delta = mean(second) - mean(first);
    if delta < -TREND_THRESHOLD {
        Trend::Improving
    } else if delta > TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Per-dimension accuracy, ordered by dimension name.
pub fn dimension_accuracy(entries: &[FeedbackEntry]) -> Vec<DimensionAccuracy> {
    let mut gaps: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for entry in chronological(entries) {
        for row in &entry.dimension_feedback {
            gaps.entry(row.dimension.as_str()).or_default().push(row.gap().abs());
        }
    }

    gaps.into_iter()
        .map(|(dim, seq)| {
            let avg_gap = mean(&seq);
            DimensionAccuracy {
                dimension: dim.to_string(),
                accuracy: (100.0 - avg_gap).max(0.0).round() as u8,
                avg_gap,
                sample_count: seq.len(),
                trend: trend_of(&seq),
            }
        })
        .collect()
}

/// Always five buckets, `[0,20) .. [80,100]`, ascending. Entries without
/// dimension rows have no score and are skipped.
pub fn calibration_buckets(entries: &[FeedbackEntry]) -> Vec<CalibrationBucket> {
    let mut credits: [Vec<f64>; BUCKETS] = Default::default();
    for entry in entries {
        let Some(score) = entry.mean_ai_score() else {
            continue;
        };
        let idx = ((score.clamp(0.0, 100.0) / BUCKET_WIDTH) as usize).min(BUCKETS - 1);
        credits[idx].push(entry.overall_agreement.credit());
    }

    credits
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let lower = i as f64 * BUCKET_WIDTH;
            let predicted = lower + BUCKET_WIDTH / 2.0;
            let (actual, calibration_error) = if bucket.is_empty() {
                (0.0, 0.0)
            } else {
                let actual = mean(bucket) * 100.0;
                (actual, (predicted - actual).abs())
            };
            CalibrationBucket {
                lower: lower as u8,
                upper: (lower + BUCKET_WIDTH) as u8,
                predicted,
                actual,
                sample_count: bucket.len(),
                calibration_error,
            }
        })
        .collect()
}

pub fn prediction_accuracy(entries: &[FeedbackEntry]) -> PredictionAccuracy {
    PredictionAccuracy {
        overall: overall_accuracy(entries),
        sample_size: entries.len(),
        dimensions: dimension_accuracy(entries),
        calibration_buckets: calibration_buckets(entries),
    }
}
