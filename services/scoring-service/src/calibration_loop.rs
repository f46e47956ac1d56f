use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::state::{RunTrigger, SharedState};

pub async fn run_calibration_loop(state: SharedState, every: Duration) {
    info!(every_secs = every.as_secs(), "calibration_loop: started");

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match state.engine.run_calibration(Utc::now()).await {
            Ok(outcome) => {
                let run = state.push_run(RunTrigger::Scheduled, outcome).await;
                info!(
                    run_id = %run.run_id,
                    health = run.outcome.report.health_score,
                    applied = run.outcome.next_weights.is_some(),
                    "calibration_loop: run recorded"
                );
            }
            Err(e) => {
                warn!("calibration_loop: run failed: {e}");
            }
        }
    }
}
