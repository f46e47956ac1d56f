use scoring::ScoringError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("weights: {0}")]
    Weights(#[from] ScoringError),

    #[error("invalid feedback: {0}")]
    InvalidFeedback(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
