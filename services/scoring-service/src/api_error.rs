use axum::http::StatusCode;
use calibration::CalibrationError;
use claims::ClaimsError;
use engine::EngineError;
use tracing::error;

pub type ApiError = (StatusCode, String);

pub fn claims_error(e: ClaimsError) -> ApiError {
    let status = match &e {
        ClaimsError::NotFound(_) => StatusCode::NOT_FOUND,
        ClaimsError::AlreadyVerified(_) => StatusCode::CONFLICT,
        ClaimsError::WrongApplication { .. } => StatusCode::BAD_REQUEST,
        ClaimsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

pub fn calibration_error(e: CalibrationError) -> ApiError {
    match e {
        CalibrationError::InvalidFeedback(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        other => {
            error!("calibration failure: {other}");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

pub fn engine_error(e: EngineError) -> ApiError {
    match e {
        EngineError::Claims(e) => claims_error(e),
        EngineError::Calibration(e) => calibration_error(e),
        EngineError::Scoring(e) => {
            error!("scoring failure: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
