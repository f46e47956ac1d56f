use chrono::{DateTime, Utc};
use claims::{Claim, Omission};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    aggregate_categories, generate_red_flags, overall_score, recommend, CategoryScore,
    FlagCounts, Grade, Recommendation, RedFlag, Result, ScoringError, ScoringWeights,
};

pub type ReportId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Generated,
    Template,
}

/// Free-text explanation attached to a report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

impl Narrative {
    pub fn template(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: NarrativeSource::Template,
        }
    }

    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: NarrativeSource::Generated,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiligenceReport {
    /// Content hash of everything except `summary`.
    pub id: ReportId,
    pub application_id: String,
    pub overall_score: u8,
    pub grade: Grade,
    pub category_scores: Vec<CategoryScore>,
    pub red_flags: Vec<RedFlag>,
    pub flag_counts: FlagCounts,
    pub recommendation: Recommendation,
    pub weights_version: u64,
    pub generated_at: DateTime<Utc>,
    pub summary: Narrative,
}

#[derive(Serialize)]
struct ReportContent<'a> {
    application_id: &'a str,
    overall_score: u8,
    grade: Grade,
    category_scores: &'a [CategoryScore],
    red_flags: &'a [RedFlag],
    recommendation: Recommendation,
    weights_version: u64,
    generated_at: &'a DateTime<Utc>,
}

impl DiligenceReport {
    fn compute_id(&self) -> Result<ReportId> {
        let content = ReportContent {
            application_id: &self.application_id,
            overall_score: self.overall_score,
            grade: self.grade,
            category_scores: &self.category_scores,
            red_flags: &self.red_flags,
            recommendation: self.recommendation,
            weights_version: self.weights_version,
            generated_at: &self.generated_at,
        };
        let bytes =
            bincode::serialize(&content).map_err(|e| ScoringError::Serialization(e.to_string()))?;
        Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
    }

    /// Deterministic fallback text for `summary`.
    pub fn template_summary(&self) -> String {
        if self.category_scores.is_empty() {
            return format!(
                "No claims have been extracted for application {} yet; score {} (grade {}), recommendation: {}.",
                self.application_id,
                self.overall_score,
                self.grade,
                self.recommendation.as_str()
            );
        }

        let mut text = format!(
            "Application {} scored {}/100 (grade {}); recommendation: {}. {} red flag(s): {} critical, {} high, {} medium.",
            self.application_id,
            self.overall_score,
            self.grade,
            self.recommendation.as_str(),
            self.red_flags.len(),
            self.flag_counts.critical,
            self.flag_counts.high,
            self.flag_counts.medium,
        );

        let weakest = self
            .category_scores
            .iter()
            .min_by(|a, b| a.category_confidence.total_cmp(&b.category_confidence));
        if let Some(w) = weakest {
            text.push_str(&format!(
                " Weakest category: {} at {:.0}% confidence.",
                w.category,
                w.category_confidence * 100.0
            ));
        }
        text
    }
}

/// Scores one application's claims and omissions.
///
/// Claims belonging to another application are ignored. No claims at all is
/// a normal state and yields score 0, grade F and no flags.
pub fn build_report(
    application_id: &str,
    claims: &[Claim],
    omissions: &[Omission],
    weights: &ScoringWeights,
    generated_at: DateTime<Utc>,
) -> Result<DiligenceReport> {
    let (own, foreign): (Vec<Claim>, Vec<Claim>) = claims
        .iter()
        .cloned()
        .partition(|c| c.application_id == application_id);
    if !foreign.is_empty() {
        warn!(application_id, ignored = foreign.len(), "claims for other applications ignored");
    }

    let category_scores = aggregate_categories(&own);
    let overall = overall_score(&category_scores, weights)?;
    let grade = Grade::from_score(overall);

    let red_flags = if own.is_empty() {
        Vec::new()
    } else {
        generate_red_flags(&own, omissions)
    };
    let flag_counts = FlagCounts::of(&red_flags);
    let recommendation = recommend(grade, flag_counts.critical, flag_counts.high);

    let mut report = DiligenceReport {
        id: String::new(),
        application_id: application_id.to_string(),
        overall_score: overall,
        grade,
        category_scores,
        red_flags,
        flag_counts,
        recommendation,
        weights_version: weights.dimensions.version(),
        generated_at,
        summary: Narrative::template(String::new()),
    };
    report.id = report.compute_id()?;
    report.summary = Narrative::template(report.template_summary());

    info!(
        application_id,
        report_id = %report.id,
        score = report.overall_score,
        grade = %report.grade,
        flags = report.red_flags.len(),
        recommendation = report.recommendation.as_str(),
        "diligence report built"
    );

    Ok(report)
}
