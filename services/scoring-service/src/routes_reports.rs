use axum::{extract::{Path, State}, http::StatusCode, Json};
use scoring::DiligenceReport;

use crate::api_error::{engine_error, ApiError};
use crate::state::SharedState;

pub async fn post_report(
    State(state): State<SharedState>,
    Path(application_id): Path<String>,
) -> Result<(StatusCode, Json<DiligenceReport>), ApiError> {
    let report = state
        .engine
        .generate_report(&application_id)
        .await
        .map_err(engine_error)?;
    state.push_report(report.clone()).await;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Every report generated for the application, oldest first.
pub async fn get_reports(
    State(state): State<SharedState>,
    Path(application_id): Path<String>,
) -> Json<Vec<DiligenceReport>> {
    Json(state.get_reports(&application_id).await)
}
