use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use calibration::{Agreement, DimensionFeedback, FeedbackEntry, FeedbackStore, InMemoryFeedbackStore};
use chrono::{DateTime, TimeZone, Utc};
use claims::{Claim, ClaimCategory, ClaimStatus, InMemoryClaimStore, Omission, Priority};
use engine::{DiligenceEngine, EngineConfig};
use narrative::{Findings, NarrativeGenerator, ProviderInfo};
use scoring::{Grade, NarrativeSource};

struct FixedNarrator(&'static str);

#[async_trait]
impl NarrativeGenerator for FixedNarrator {
    async fn summarize(&self, findings: &Findings) -> anyhow::Result<String> {
        Ok(format!("{{\"summary\": \"{} for {}\"}}", self.0, findings.subject))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo { name: "fixed".into(), base_url: "memory://".into() }
    }
}

struct BrokenNarrator;

#[async_trait]
impl NarrativeGenerator for BrokenNarrator {
    async fn summarize(&self, _findings: &Findings) -> anyhow::Result<String> {
        anyhow::bail!("connection refused")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        anyhow::bail!("connection refused")
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo { name: "broken".into(), base_url: "http://127.0.0.1:9".into() }
    }
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap()
}

fn seeded_claims() -> Arc<InMemoryClaimStore> {
    let store = InMemoryClaimStore::new();
    store
        .put_claims(
            "acme",
            vec![
                Claim::new("a1", "acme", ClaimCategory::TeamBackground, Priority::High, "Repeat founders")
                    .with_status(ClaimStatus::Confirmed),
                Claim::new("a2", "acme", ClaimCategory::RevenueMetrics, Priority::Critical, "$1.2M ARR")
                    .with_status(ClaimStatus::Refuted),
                Claim::new("a3", "acme", ClaimCategory::Traction, Priority::Medium, "30% MoM")
                    .with_status(ClaimStatus::AiVerified),
            ],
        )
        .unwrap();
    store
        .put_omissions(
            "acme",
            vec![Omission {
                category: ClaimCategory::Fundraising,
                severity: Priority::High,
                description: "Prior round terms not disclosed".into(),
            }],
        )
        .unwrap();
    Arc::new(store)
}

fn engine(narrator: Option<Arc<dyn NarrativeGenerator>>) -> DiligenceEngine {
    let config = EngineConfig {
        narrative_timeout: Duration::from_millis(200),
        ..EngineConfig::default()
    };
    let engine = DiligenceEngine::new(seeded_claims(), Arc::new(InMemoryFeedbackStore::new()), config);
    match narrator {
        Some(n) => engine.with_narrator(n),
        None => engine,
    }
}

#[tokio::test]
async fn test_narrative_never_changes_numbers() {
    let plain = engine(None).generate_report_at("acme", at()).await.unwrap();
    let broken_narrator: Arc<dyn NarrativeGenerator> = Arc::new(BrokenNarrator);
    let fixed_narrator: Arc<dyn NarrativeGenerator> = Arc::new(FixedNarrator("Mixed picture"));
    let broken = engine(Some(broken_narrator)).generate_report_at("acme", at()).await.unwrap();
    let fixed = engine(Some(fixed_narrator))
        .generate_report_at("acme", at())
        .await
        .unwrap();

    assert_eq!(plain.summary.source, NarrativeSource::Template);
    assert_eq!(broken.summary, plain.summary);
    assert_eq!(fixed.summary.source, NarrativeSource::Generated);
    assert_eq!(fixed.summary.text, "Mixed picture for acme");

    for other in [&broken, &fixed] {
        assert_eq!(other.id, plain.id);
        assert_eq!(other.overall_score, plain.overall_score);
        assert_eq!(other.category_scores, plain.category_scores);
        assert_eq!(other.red_flags, plain.red_flags);
        assert_eq!(other.recommendation, plain.recommendation);
    }

    // refuted critical claim + high omission
    assert_eq!(plain.flag_counts.critical, 1);
    assert_eq!(plain.flag_counts.medium, 1);
    assert!(plain.red_flags.iter().any(|f| f.claim_id() == Some("a2")));
}

#[tokio::test]
async fn test_unknown_application_is_empty_report() {
    let report = engine(None).generate_report_at("nobody", at()).await.unwrap();
    assert_eq!(report.overall_score, 0);
    assert_eq!(report.grade, Grade::F);
    assert!(report.red_flags.is_empty());
}

#[tokio::test]
async fn test_calibration_feeds_next_report() {
    let feedback = Arc::new(InMemoryFeedbackStore::new());
    for i in 0..20 {
        feedback
            .add_feedback(FeedbackEntry {
                application_id: format!("app-{i}"),
                report_id: format!("r-{i}"),
                dimension_feedback: vec![DimensionFeedback::new("founder", 50.0, 90.0)],
                overall_agreement: Agreement::PartiallyAgree,
                outcome_data: None,
                created_at: at() - chrono::Duration::days(i),
            })
            .unwrap();
    }

    let engine = DiligenceEngine::new(seeded_claims(), feedback.clone(), EngineConfig::default())
        .with_narrator(Arc::new(FixedNarrator("Calibrated")));

    let before = engine.generate_report_at("acme", at()).await.unwrap();
    assert_eq!(before.weights_version, 0);

    let outcome = engine.run_calibration(at()).await.unwrap();
    assert_eq!(outcome.report.feedback_count, 20);
    assert_eq!(outcome.report.summary.source, NarrativeSource::Generated);
    let next = outcome.next_weights.unwrap();
    assert!(next.get("founder") > 1.0);
    assert_eq!(feedback.get_current_weights().unwrap(), next);

    let after = engine.generate_report_at("acme", at()).await.unwrap();
    assert_eq!(after.weights_version, 1);
    assert_ne!(after.id, before.id);
}

#[tokio::test]
async fn test_concurrent_calibrations_apply_in_sequence() {
    let feedback = Arc::new(InMemoryFeedbackStore::new());
    for i in 0..12 {
        feedback
            .add_feedback(FeedbackEntry {
                application_id: format!("app-{i}"),
                report_id: format!("r-{i}"),
                dimension_feedback: vec![DimensionFeedback::new("market", 90.0, 60.0)],
                overall_agreement: Agreement::Disagree,
                outcome_data: None,
                created_at: at() - chrono::Duration::hours(i),
            })
            .unwrap();
    }
    let engine = Arc::new(DiligenceEngine::new(
        Arc::new(InMemoryClaimStore::new()),
        feedback.clone(),
        EngineConfig::default(),
    ));

    let (a, b) = tokio::join!(engine.run_calibration(at()), engine.run_calibration(at()));
    let versions = {
        let mut v = vec![
            a.unwrap().next_weights.unwrap().version(),
            b.unwrap().next_weights.unwrap().version(),
        ];
        v.sort();
        v
    };
    assert_eq!(versions, vec![1, 2]);
    assert_eq!(feedback.weight_history().unwrap().len(), 3);
}
