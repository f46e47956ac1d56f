use std::sync::Arc;

use calibration::{
    calibrate, CalibrationInput, CalibrationOutcome, CalibrationReport, FeedbackStore,
    SignalRanker, UnrankedSignals,
};
use chrono::{DateTime, Utc};
use claims::ClaimStore;
use narrative::{narrate, Findings, FindingsKind, NarrativeGenerator};
use scoring::{build_report, DiligenceReport, ScoringWeights};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::{EngineConfig, Result};

/// Runs diligence scoring and calibration against the configured stores.
///
/// Report generation is independent per application and may run
/// concurrently. Calibration runs are serialized so that weight updates
/// are applied one at a time.
pub struct DiligenceEngine {
    claims: Arc<dyn ClaimStore>,
    feedback: Arc<dyn FeedbackStore>,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
    ranker: Arc<dyn SignalRanker>,
    config: EngineConfig,
    calibration_lock: Mutex<()>,
}

#[derive(Serialize)]
struct CategoryFact {
    category: &'static str,
    confidence: f64,
    claims: usize,
}

#[derive(Serialize)]
struct ReportFacts<'a> {
    overall_score: u8,
    grade: String,
    recommendation: &'static str,
    critical_flags: usize,
    high_flags: usize,
    medium_flags: usize,
    categories: Vec<CategoryFact>,
    flag_reasons: Vec<&'a str>,
}

fn report_findings(report: &DiligenceReport) -> Findings {
    let facts = ReportFacts {
        overall_score: report.overall_score,
        grade: report.grade.to_string(),
        recommendation: report.recommendation.as_str(),
        critical_flags: report.flag_counts.critical,
        high_flags: report.flag_counts.high,
        medium_flags: report.flag_counts.medium,
        categories: report
            .category_scores
            .iter()
            .map(|c| CategoryFact {
                category: c.category.as_str(),
                confidence: c.category_confidence,
                claims: c.total_claims,
            })
            .collect(),
        flag_reasons: report.red_flags.iter().take(5).map(|f| f.reason.as_str()).collect(),
    };

    Findings {
        kind: FindingsKind::Diligence,
        subject: report.application_id.clone(),
        headline: format!(
            "Score {}/100, grade {}, recommendation {}",
            report.overall_score,
            report.grade,
            report.recommendation.as_str()
        ),
        facts: serde_json::to_value(&facts).unwrap_or_default(),
    }
}

fn calibration_findings(report: &CalibrationReport) -> Findings {
    let facts = serde_json::json!({
        "feedback_count": report.feedback_count,
        "health_score": report.health_score,
        "overall_health": report.overall_health.as_str(),
        "accuracy": report.prediction_accuracy.overall,
        "drift": report.drift.severity.as_str(),
        "affected_dimensions": report.drift.affected_dimensions,
        "recommendations": report.recommendations,
    });

    Findings {
        kind: FindingsKind::Calibration,
        subject: format!("{} to {}", report.period_start, report.period_end),
        headline: format!(
            "Health {}/100 ({})",
            report.health_score,
            report.overall_health.as_str()
        ),
        facts,
    }
}

impl DiligenceEngine {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        feedback: Arc<dyn FeedbackStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            claims,
            feedback,
            narrator: None,
            ranker: Arc::new(UnrankedSignals),
            config,
            calibration_lock: Mutex::new(()),
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn with_signal_ranker(mut self, ranker: Arc<dyn SignalRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn scoring_weights(&self) -> Result<ScoringWeights> {
        Ok(ScoringWeights {
            categories: self.config.category_weights.clone(),
            dimensions: self.feedback.get_current_weights()?,
            mapping: self.config.category_dimensions.clone(),
        })
    }

    pub async fn generate_report(&self, application_id: &str) -> Result<DiligenceReport> {
        self.generate_report_at(application_id, Utc::now()).await
    }

    /// Scores the application's current claims with the current weights.
    pub async fn generate_report_at(
        &self,
        application_id: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<DiligenceReport> {
        let claims = self.claims.get_claims(application_id)?;
        let omissions = self.claims.get_omissions(application_id)?;
        let weights = self.scoring_weights()?;

        let mut report = build_report(application_id, &claims, &omissions, &weights, generated_at)?;

        let findings = report_findings(&report);
        report.summary = narrate(
            self.narrator.as_deref(),
            &findings,
            report.summary.text.clone(),
            self.config.narrative_timeout,
        )
        .await;

        Ok(report)
    }

    /// Calibrates against the feedback window ending at `now` and makes the
    /// resulting weight set current when adjustments were applied.
    pub async fn run_calibration(&self, now: DateTime<Utc>) -> Result<CalibrationOutcome> {
        let _guard = self.calibration_lock.lock().await;

        let current = self.feedback.get_current_weights()?;
        let (start, end) = self.config.calibration.window(now);
        let entries = self.feedback.get_feedback(start, end)?;

        let mut outcome = calibrate(
            CalibrationInput {
                entries: &entries,
                current_weights: &current,
                period_start: start,
                period_end: end,
                generated_at: now,
            },
            &self.config.calibration,
            self.ranker.as_ref(),
        )?;

        let findings = calibration_findings(&outcome.report);
        outcome.report.summary = narrate(
            self.narrator.as_deref(),
            &findings,
            outcome.report.summary.text.clone(),
            self.config.narrative_timeout,
        )
        .await;

        if let Some(next) = &outcome.next_weights {
            self.feedback.set_weights(next.clone())?;
            info!(
                from = current.version(),
                to = next.version(),
                "dimension weights updated"
            );
        }

        Ok(outcome)
    }
}
