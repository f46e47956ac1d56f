use chrono::{DateTime, Utc};
use scoring::{Narrative, WeightSet};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    apply_adjustments, detect_drift, health_score, outcome_predictions, partner_alignment,
    prediction_accuracy, propose_adjustments, CalibrationConfig, DriftReport, FeedbackEntry,
    HealthLabel, OutcomePredictions, PartnerAlignment, PredictionAccuracy, Result,
    SignalEffectiveness, SignalRanker, Trend, WeightAdjustment,
};

const LOW_ACCURACY: u8 = 70;
const LOW_OUTCOME_ACCURACY: u8 = 60;
const MIN_TRACKED_OUTCOMES: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub feedback_count: usize,
    pub weights_version: u64,
    pub overall_health: HealthLabel,
    pub health_score: u8,
    pub prediction_accuracy: PredictionAccuracy,
    pub drift: DriftReport,
    pub recommended_adjustments: Vec<WeightAdjustment>,
    pub partner_alignment: PartnerAlignment,
    pub outcome_predictions: OutcomePredictions,
    pub signal_effectiveness: Vec<SignalEffectiveness>,
    pub recommendations: Vec<String>,
    pub summary: Narrative,
}

impl CalibrationReport {
    pub fn template_summary(&self) -> String {
        let applied = self.recommended_adjustments.iter().filter(|a| a.applied).count();
        let held = self.recommended_adjustments.len() - applied;
        format!(
            "Calibration over {} feedback entries: health {}/100 ({}), accuracy {}%, drift {}. {} weight adjustment(s) applied, {} held back.",
            self.feedback_count,
            self.health_score,
            self.overall_health.as_str(),
            self.prediction_accuracy.overall,
            self.drift.severity.as_str(),
            applied,
            held,
        )
    }
}

/// Result of one calibration run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOutcome {
    pub report: CalibrationReport,
    /// Successor weights when at least one adjustment was applied.
    pub next_weights: Option<WeightSet>,
}

/// Explicit inputs of a calibration run.
pub struct CalibrationInput<'a> {
    pub entries: &'a [FeedbackEntry],
    pub current_weights: &'a WeightSet,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

fn recommendations(
    report: &CalibrationReport,
    config: &CalibrationConfig,
) -> Vec<String> {
    let mut out = Vec::new();

    if report.feedback_count < config.min_sample_size {
        out.push(format!(
            "Only {} feedback entries in the window; at least {} are needed before weights are recalibrated.",
            report.feedback_count, config.min_sample_size
        ));
    }

    if report.drift.detected {
        let dims = if report.drift.affected_dimensions.is_empty() {
            "none".to_string()
        } else {
            report.drift.affected_dimensions.join(", ")
        };
        out.push(format!(
            "Scoring drift detected ({}): score shift {:.1}, affected dimensions: {}.",
            report.drift.severity.as_str(),
            report.drift.score_shift,
            dims
        ));
    }

    let accuracy = &report.prediction_accuracy;
    if accuracy.sample_size > 0 && accuracy.overall < LOW_ACCURACY {
        let mut worst: Vec<_> = accuracy.dimensions.iter().collect();
        worst.sort_by_key(|d| d.accuracy);
        let names: Vec<&str> = worst.iter().take(3).map(|d| d.dimension.as_str()).collect();
        out.push(format!(
            "Prediction accuracy is {}%; review the largest gaps first: {}.",
            accuracy.overall,
            if names.is_empty() { "n/a".to_string() } else { names.join(", ") }
        ));
    }

    for dim in accuracy.dimensions.iter().filter(|d| d.trend == Trend::Declining) {
        out.push(format!("Accuracy for {} is declining.", dim.dimension));
    }

    for adj in &report.recommended_adjustments {
        if adj.applied {
            out.push(format!(
                "Weight for {} moved from {:.3} to {:.3}: {}.",
                adj.dimension, adj.current_weight, adj.recommended_weight, adj.reason
            ));
        } else {
            out.push(format!(
                "Adjustment for {} held back: {} samples (confidence {:.2}).",
                adj.dimension, adj.sample_count, adj.confidence
            ));
        }
    }

    let outcomes = &report.outcome_predictions;
    if let Some(acc) = outcomes.accuracy {
        if outcomes.tracked >= MIN_TRACKED_OUTCOMES && acc < LOW_OUTCOME_ACCURACY {
            out.push(format!(
                "Only {acc}% of {} tracked decisions matched later outcomes.",
                outcomes.tracked
            ));
        }
    }

    if out.is_empty() {
        out.push("Scoring is aligned with reviewer judgment; no action needed.".to_string());
    }
    out
}

/// Runs the accuracy, drift and weight analyses over one feedback window.
///
/// Entries created outside `[period_start, period_end]` and entries with
/// out-of-range scores are skipped. An empty window produces a complete
/// report with zeroed metrics.
pub fn calibrate(
    input: CalibrationInput<'_>,
    config: &CalibrationConfig,
    ranker: &dyn SignalRanker,
) -> Result<CalibrationOutcome> {
    let in_window: Vec<&FeedbackEntry> = input
        .entries
        .iter()
        .filter(|e| e.created_at >= input.period_start && e.created_at <= input.period_end)
        .collect();
    if in_window.len() < input.entries.len() {
        warn!(
            ignored = input.entries.len() - in_window.len(),
            "feedback outside the calibration window ignored"
        );
    }

    let mut entries = Vec::with_capacity(in_window.len());
    for entry in in_window {
        match entry.validate() {
            Ok(()) => entries.push(entry.clone()),
            Err(err) => warn!(report_id = %entry.report_id, %err, "invalid feedback skipped"),
        }
    }

    let prediction_accuracy = prediction_accuracy(&entries);
    let drift = detect_drift(&entries);
    let partner_alignment = partner_alignment(&entries);
    let health = health_score(
        prediction_accuracy.overall,
        partner_alignment.agreement_rate,
        drift.severity,
    )?;

    let adjustments = propose_adjustments(&entries, input.current_weights, config);
    let next_weights = apply_adjustments(input.current_weights, &adjustments)?;

    let mut report = CalibrationReport {
        generated_at: input.generated_at,
        period_start: input.period_start,
        period_end: input.period_end,
        feedback_count: entries.len(),
        weights_version: input.current_weights.version(),
        overall_health: HealthLabel::from_score(health),
        health_score: health,
        prediction_accuracy,
        drift,
        recommended_adjustments: adjustments,
        partner_alignment,
        outcome_predictions: outcome_predictions(&entries),
        signal_effectiveness: ranker.rank(&entries),
        recommendations: Vec::new(),
        summary: Narrative::template(String::new()),
    };
    report.recommendations = recommendations(&report, config);
    report.summary = Narrative::template(report.template_summary());

    info!(
        entries = report.feedback_count,
        health = report.health_score,
        label = report.overall_health.as_str(),
        drift = report.drift.severity.as_str(),
        next_version = next_weights.as_ref().map(|w| w.version()),
        "calibration run complete"
    );

    Ok(CalibrationOutcome {
        report,
        next_weights,
    })
}
