use std::sync::Arc;

use anyhow::Result;
use calibration::{Agreement, DimensionFeedback, FeedbackEntry, InMemoryFeedbackStore, OutcomeData, OutcomeStatus};
use chrono::{Duration, Utc};
use claims::{BenchmarkFlag, Claim, ClaimCategory, ClaimStatus, InMemoryClaimStore, Omission, Priority, Verification};
use engine::{DiligenceEngine, EngineConfig};

fn seed_claims(store: &InMemoryClaimStore) -> Result<()> {
    use ClaimCategory::*;

    store.put_claims(
        "northwind",
        vec![
            Claim::new("nw-1", "northwind", TeamBackground, Priority::High, "Both founders previously exited a logistics startup"),
            Claim::new("nw-2", "northwind", RevenueMetrics, Priority::Critical, "$85k MRR growing 12% month over month"),
            Claim::new("nw-3", "northwind", Traction, Priority::High, "140 paying fleets"),
            Claim::new("nw-4", "northwind", MarketSize, Priority::Medium, "$40B addressable market in the EU"),
            Claim::new("nw-5", "northwind", CustomerReference, Priority::Medium, "Signed LOI with a top-3 carrier"),
            Claim::new("nw-6", "northwind", TechnologyIp, Priority::Low, "Patent pending on route batching")
                .with_status(ClaimStatus::Unverifiable),
            Claim::new("nw-7", "northwind", Traction, Priority::Medium, "Net revenue retention of 135%")
                .contradicting("nw-3"),
        ],
    )?;
    store.put_omissions(
        "northwind",
        vec![Omission {
            category: Fundraising,
            severity: Priority::High,
            description: "Cap table and prior SAFE terms not provided".into(),
        }],
    )?;

    // verifier verdicts arrive one by one
    let verdicts = [
        ("nw-1", ClaimStatus::Confirmed, BenchmarkFlag::Unflagged),
        ("nw-2", ClaimStatus::AiVerified, BenchmarkFlag::AboveBenchmark),
        ("nw-3", ClaimStatus::Disputed, BenchmarkFlag::Unflagged),
        ("nw-4", ClaimStatus::Confirmed, BenchmarkFlag::Unrealistic),
        ("nw-7", ClaimStatus::Refuted, BenchmarkFlag::Unflagged),
    ];
    for (id, status, benchmark_flag) in verdicts {
        store.record_verification("northwind", id, Verification { status, benchmark_flag })?;
    }
    Ok(())
}

fn seed_feedback(store: &InMemoryFeedbackStore) -> Result<()> {
    let now = Utc::now();
    for i in 0..30i64 {
        // older half agrees, newer half shows the founder dimension drifting upward
        let founder_ai = if i < 15 { 64.0 } else { 82.0 };
        let agreement = match i % 5 {
            0 => Agreement::Disagree,
            1 | 2 => Agreement::PartiallyAgree,
            _ => Agreement::Agree,
        };
        store.add_feedback(FeedbackEntry {
            application_id: format!("app-{i:02}"),
            report_id: format!("report-{i:02}"),
            dimension_feedback: vec![
                DimensionFeedback::new("founder", founder_ai, 62.0),
                DimensionFeedback::new("market", 55.0, 58.0),
                DimensionFeedback::new("traction", 48.0, 60.0),
            ],
            overall_agreement: agreement,
            outcome_data: (i < 8).then(|| OutcomeData {
                status: if i % 3 == 0 { OutcomeStatus::Failed } else { OutcomeStatus::Graduated },
                reported_at: now - Duration::days(2),
            }),
            created_at: now - Duration::days(60 - 2 * i),
        })?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Diligence Demo: scoring and calibration ===\n");

    let claims = Arc::new(InMemoryClaimStore::new());
    let feedback = Arc::new(InMemoryFeedbackStore::new());
    seed_claims(&claims)?;
    seed_feedback(&feedback)?;

    let engine = DiligenceEngine::new(claims, feedback, EngineConfig::default());

    // 1. Report with the starting weights
    println!("--- Report (weights v0) ---");
    let report = engine.generate_report("northwind").await?;
    println!("Report ID:      {}", report.id);
    println!("Score / Grade:  {} / {}", report.overall_score, report.grade);
    println!("Recommendation: {}", report.recommendation.as_str());
    for c in &report.category_scores {
        println!(
            "  {:<20} confidence {:.2}  ({} claims, {} confirmed)",
            c.category.as_str(),
            c.category_confidence,
            c.total_claims,
            c.confirmed_claims
        );
    }
    println!("Red flags:");
    for f in &report.red_flags {
        println!("  [{:?}] {}: {}", f.severity, f.category.as_str(), f.reason);
    }
    println!("Summary: {}", report.summary.text);

    // 2. Calibration over the last 90 days of feedback
    println!("\n--- Calibration ---");
    let outcome = engine.run_calibration(Utc::now()).await?;
    let cal = &outcome.report;
    println!("Feedback entries: {}", cal.feedback_count);
    println!("Health:           {} ({})", cal.health_score, cal.overall_health.as_str());
    println!("Accuracy:         {}%", cal.prediction_accuracy.overall);
    println!("Drift:            {} {:?}", cal.drift.severity.as_str(), cal.drift.affected_dimensions);
    for adj in &cal.recommended_adjustments {
        println!(
            "  {:<10} {:.3} -> {:.3}  applied={} ({})",
            adj.dimension, adj.current_weight, adj.recommended_weight, adj.applied, adj.reason
        );
    }
    for rec in &cal.recommendations {
        println!("  * {rec}");
    }

    // 3. Same claims, learned weights
    println!("\n--- Report (learned weights) ---");
    let rescored = engine.generate_report("northwind").await?;
    println!("Weights version: {}", rescored.weights_version);
    println!("Score / Grade:   {} / {}", rescored.overall_score, rescored.grade);
    println!("Report ID:       {}", rescored.id);

    println!("\n--- Report JSON ---");
    println!("{}", serde_json::to_string_pretty(&rescored)?);

    Ok(())
}
