use axum::{extract::State, http::StatusCode, Json};
use calibration::{FeedbackEntry, FeedbackStore};
use chrono::Utc;
use scoring::WeightSet;
use serde::Serialize;

use crate::api_error::{calibration_error, engine_error, ApiError};
use crate::state::{CalibrationRun, RunTrigger, SharedState};

pub async fn post_feedback(
    State(state): State<SharedState>,
    Json(entry): Json<FeedbackEntry>,
) -> Result<StatusCode, ApiError> {
    state.feedback.add_feedback(entry).map_err(calibration_error)?;
    Ok(StatusCode::CREATED)
}

pub async fn post_calibration_run(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<CalibrationRun>), ApiError> {
    let outcome = state
        .engine
        .run_calibration(Utc::now())
        .await
        .map_err(engine_error)?;
    let run = state.push_run(RunTrigger::Manual, outcome).await;
    Ok((StatusCode::CREATED, Json(run)))
}

pub async fn get_calibration_runs(State(state): State<SharedState>) -> Json<Vec<CalibrationRun>> {
    Json(state.calibration_runs.read().await.clone())
}

#[derive(Serialize)]
pub struct WeightsResponse {
    pub current: WeightSet,
    pub history: Vec<WeightSet>,
}

pub async fn get_weights(State(state): State<SharedState>) -> Result<Json<WeightsResponse>, ApiError> {
    let current = state.feedback.get_current_weights().map_err(calibration_error)?;
    let history = state.feedback.weight_history().map_err(calibration_error)?;
    Ok(Json(WeightsResponse { current, history }))
}
