use calibration::{
    calibrate, detect_drift, Agreement, CalibrationConfig, CalibrationInput, DimensionFeedback,
    DriftSeverity, Effectiveness, FeedbackEntry, FeedbackStore, HealthLabel,
    InMemoryFeedbackStore, OutcomeData, OutcomeStatus, UnrankedSignals,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scoring::weights::{MAX_WEIGHT, MIN_WEIGHT};
use scoring::WeightSet;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

fn entry(day: i64, agreement: Agreement, rows: Vec<DimensionFeedback>) -> FeedbackEntry {
    FeedbackEntry {
        application_id: format!("app-{day}"),
        report_id: format!("report-{day}"),
        dimension_feedback: rows,
        overall_agreement: agreement,
        outcome_data: None,
        created_at: base() + Duration::days(day),
    }
}

#[test]
fn test_founder_gap_widening_is_detected() {
    let mut entries = Vec::new();
    for day in 0..10 {
        entries.push(entry(day, Agreement::Agree, vec![DimensionFeedback::new("founder", 70.0, 68.0)]));
    }
    for day in 10..20 {
        entries.push(entry(day, Agreement::Agree, vec![DimensionFeedback::new("founder", 85.0, 65.0)]));
    }

    let drift = detect_drift(&entries);
    assert!(drift.detected);
    assert!(drift.affected_dimensions.iter().any(|d| d == "founder"));
    assert!(drift.severity >= DriftSeverity::Moderate);
    assert_eq!(drift.first_period_entries, 10);
    assert_eq!(drift.second_period_entries, 10);
}

#[test]
fn test_empty_window_gives_complete_report() {
    let current = WeightSet::new();
    let outcome = calibrate(
        CalibrationInput {
            entries: &[],
            current_weights: &current,
            period_start: base() - Duration::days(90),
            period_end: base(),
            generated_at: base(),
        },
        &CalibrationConfig::default(),
        &UnrankedSignals,
    )
    .unwrap();

    let report = &outcome.report;
    assert!(outcome.next_weights.is_none());
    assert_eq!(report.feedback_count, 0);
    assert_eq!(report.prediction_accuracy.overall, 0);
    assert_eq!(report.prediction_accuracy.calibration_buckets.len(), 5);
    assert!(!report.drift.detected);
    assert_eq!(report.overall_health, HealthLabel::Critical);
    assert!(report.recommended_adjustments.is_empty());
    assert!(report.signal_effectiveness.is_empty());
    assert!(report.recommendations[0].starts_with("Only 0 feedback entries"));
}

#[test]
fn test_full_run_against_store() {
    let store = InMemoryFeedbackStore::new();
    for day in 0..24 {
        let agreement = if day % 4 == 0 { Agreement::PartiallyAgree } else { Agreement::Agree };
        let mut e = entry(
            day,
            agreement,
            vec![
                DimensionFeedback::new("founder", 82.0, 70.0),
                DimensionFeedback::new("market", 60.0, 61.0),
            ],
        );
        if day < 6 {
            e.outcome_data = Some(OutcomeData {
                status: OutcomeStatus::Graduated,
                reported_at: base() + Duration::days(60),
            });
        }
        store.add_feedback(e).unwrap();
    }
    // outside the window
    store
        .add_feedback(entry(-200, Agreement::Disagree, vec![DimensionFeedback::new("founder", 10.0, 90.0)]))
        .unwrap();

    let config = CalibrationConfig::default();
    let now = base() + Duration::days(30);
    let (start, end) = config.window(now);
    let entries = store.get_feedback(start, end).unwrap();
    assert_eq!(entries.len(), 24);

    let current = store.get_current_weights().unwrap();
    let outcome = calibrate(
        CalibrationInput {
            entries: &entries,
            current_weights: &current,
            period_start: start,
            period_end: end,
            generated_at: now,
        },
        &config,
        &UnrankedSignals,
    )
    .unwrap();
    let report = &outcome.report;

    // 18 agree + 6 partial
    assert_eq!(report.prediction_accuracy.overall, 88);
    assert_eq!(report.partner_alignment.agreement_rate, 75.0);
    assert!(!report.drift.detected);
    // 0.4*88 + 0.4*75 + 0.2*100 = 85.2
    assert_eq!(report.health_score, 85);
    assert_eq!(report.overall_health, HealthLabel::Excellent);

    assert_eq!(report.recommended_adjustments.len(), 1);
    let adj = &report.recommended_adjustments[0];
    assert_eq!(adj.dimension, "founder");
    assert!(adj.applied);
    assert!(adj.recommended_weight < 1.0);

    assert_eq!(report.outcome_predictions.tracked, 6);
    assert_eq!(report.outcome_predictions.accuracy, Some(100));
    assert_eq!(report.partner_alignment.overscored_dimensions, vec!["founder"]);
    assert!(report
        .signal_effectiveness
        .iter()
        .all(|s| s.effectiveness == Effectiveness::InsufficientData));

    let next = outcome.next_weights.clone().unwrap();
    assert_eq!(next.version(), 1);
    store.set_weights(next.clone()).unwrap();
    assert_eq!(store.get_current_weights().unwrap(), next);
    assert_eq!(store.weight_history().unwrap().len(), 2);

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["overall_health"], "excellent");
    assert_eq!(json["drift"]["severity"], "none");
}

#[test]
fn test_invalid_rows_are_skipped_not_fatal() {
    let mut entries: Vec<_> = (0..12)
        .map(|day| entry(day, Agreement::Disagree, vec![DimensionFeedback::new("market", 90.0, 60.0)]))
        .collect();
    entries.push(entry(12, Agreement::Agree, vec![DimensionFeedback::new("market", f64::NAN, 60.0)]));
    entries.push(entry(13, Agreement::Agree, vec![DimensionFeedback::new("founder", 50.0, 140.0)]));

    let current = WeightSet::new();
    let outcome = calibrate(
        CalibrationInput {
            entries: &entries,
            current_weights: &current,
            period_start: base(),
            period_end: base() + Duration::days(30),
            generated_at: base() + Duration::days(30),
        },
        &CalibrationConfig::default(),
        &UnrankedSignals,
    )
    .unwrap();

    let report = &outcome.report;
    assert_eq!(report.feedback_count, 12);
    assert!(report.prediction_accuracy.dimensions.iter().all(|d| d.dimension == "market"));
    let next = outcome.next_weights.unwrap();
    let market = next.get("market");
    assert!(market.is_finite());
    assert!(market < 1.0);
}

#[test]
fn test_randomized_weights_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    let dims = ["founder", "market", "product", "traction", "execution"];
    let mut weights = WeightSet::new();

    for run in 0..200 {
        let n = rng.gen_range(0..40);
        let entries: Vec<_> = (0..n)
            .map(|i| {
                let mut rows = Vec::new();
                for d in dims {
                    if rng.gen_bool(0.7) {
                        rows.push(DimensionFeedback::new(
                            d,
                            rng.gen_range(0.0..=100.0),
                            rng.gen_range(0.0..=100.0),
                        ));
                    }
                }
                let agreement = match rng.gen_range(0..3) {
                    0 => Agreement::Agree,
                    1 => Agreement::PartiallyAgree,
                    _ => Agreement::Disagree,
                };
                entry(i, agreement, rows)
            })
            .collect();

        let config = CalibrationConfig {
            learning_rate: rng.gen_range(0.01..3.0),
            ..CalibrationConfig::default()
        };
        let outcome = calibrate(
            CalibrationInput {
                entries: &entries,
                current_weights: &weights,
                period_start: base(),
                period_end: base() + Duration::days(60),
                generated_at: base() + Duration::days(60),
            },
            &config,
            &UnrankedSignals,
        )
        .unwrap();

        let report = &outcome.report;
        assert!(report.health_score <= 100, "run {run}");
        assert_eq!(report.prediction_accuracy.calibration_buckets.len(), 5);
        for adj in &report.recommended_adjustments {
            assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(&adj.recommended_weight), "run {run}");
            assert!((0.0..=1.0).contains(&adj.confidence));
        }
        if let Some(next) = outcome.next_weights {
            for (_, w) in next.iter() {
                assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(&w), "run {run}");
            }
            weights = next;
        }
    }
}
