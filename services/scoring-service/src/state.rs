use std::{collections::HashMap, sync::Arc};

use calibration::{CalibrationOutcome, InMemoryFeedbackStore};
use chrono::{DateTime, Utc};
use claims::{ApplicationId, InMemoryClaimStore};
use engine::DiligenceEngine;
use scoring::DiligenceReport;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

pub type SharedState = Arc<AppState>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    Manual,
    Scheduled,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationRun {
    pub run_id: Uuid,
    pub trigger: RunTrigger,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: CalibrationOutcome,
}

#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<InMemoryClaimStore>,
    pub feedback: Arc<InMemoryFeedbackStore>,
    pub engine: Arc<DiligenceEngine>,
    pub reports: Arc<RwLock<HashMap<ApplicationId, Vec<DiligenceReport>>>>,
    pub calibration_runs: Arc<RwLock<Vec<CalibrationRun>>>,
}

impl AppState {
    pub fn new(
        claims: Arc<InMemoryClaimStore>,
        feedback: Arc<InMemoryFeedbackStore>,
        engine: DiligenceEngine,
    ) -> Self {
        Self {
            claims,
            feedback,
            engine: Arc::new(engine),
            reports: Arc::new(RwLock::new(HashMap::new())),
            calibration_runs: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn push_report(&self, report: DiligenceReport) {
        self.reports
            .write()
            .await
            .entry(report.application_id.clone())
            .or_default()
            .push(report);
    }

    pub async fn get_reports(&self, application_id: &str) -> Vec<DiligenceReport> {
        self.reports
            .read()
            .await
            .get(application_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn push_run(&self, trigger: RunTrigger, outcome: CalibrationOutcome) -> CalibrationRun {
        let run = CalibrationRun {
            run_id: Uuid::new_v4(),
            trigger,
            recorded_at: Utc::now(),
            outcome,
        };
        self.calibration_runs.write().await.push(run.clone());
        run
    }
}
