use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("claims: {0}")]
    Claims(#[from] claims::ClaimsError),

    #[error("scoring: {0}")]
    Scoring(#[from] scoring::ScoringError),

    #[error("calibration: {0}")]
    Calibration(#[from] calibration::CalibrationError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
