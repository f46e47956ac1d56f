use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// A computed value escaped its range. Always a defect in this crate.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("weight for {key} out of range: {weight}")]
    WeightOutOfRange { key: String, weight: f64 },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// Checks a value computed by this crate against its documented range.
pub(crate) fn ensure_within(what: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ScoringError::InvariantViolation(format!(
            "{what} = {value} outside [{min}, {max}]"
        )))
    }
}
