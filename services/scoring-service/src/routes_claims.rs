use axum::{extract::{Path, State}, http::StatusCode, Json};
use claims::{Claim, Omission, Verification};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api_error::{claims_error, ApiError};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct PutClaimsRequest {
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub omissions: Vec<Omission>,
}

#[derive(Serialize)]
pub struct PutClaimsResponse {
    pub application_id: String,
    pub claims: usize,
    pub omissions: usize,
}

/// Replaces the claim set and omissions of one application.
pub async fn put_claims(
    State(state): State<SharedState>,
    Path(application_id): Path<String>,
    Json(req): Json<PutClaimsRequest>,
) -> Result<Json<PutClaimsResponse>, ApiError> {
    let counts = (req.claims.len(), req.omissions.len());

    state.claims.put_claims(&application_id, req.claims).map_err(claims_error)?;
    state.claims.put_omissions(&application_id, req.omissions).map_err(claims_error)?;
    info!(application_id = %application_id, claims = counts.0, omissions = counts.1, "claims replaced");

    Ok(Json(PutClaimsResponse {
        application_id,
        claims: counts.0,
        omissions: counts.1,
    }))
}

pub async fn post_verification(
    State(state): State<SharedState>,
    Path((application_id, claim_id)): Path<(String, String)>,
    Json(verification): Json<Verification>,
) -> Result<(StatusCode, Json<Claim>), ApiError> {
    let claim = state
        .claims
        .record_verification(&application_id, &claim_id, verification)
        .map_err(claims_error)?;
    Ok((StatusCode::CREATED, Json(claim)))
}
