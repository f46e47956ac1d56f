use claims::ClaimStatus;

pub const CONFIRMED_CREDIT: f64 = 1.0;
pub const NEUTRAL_CREDIT: f64 = 0.5;
pub const DISPUTED_PENALTY: f64 = 0.3;
pub const REFUTED_PENALTY: f64 = 0.8;

/// Signed confidence contribution of a single claim.
pub fn contribution(status: ClaimStatus) -> f64 {
    match status {
        ClaimStatus::Confirmed | ClaimStatus::AiVerified => CONFIRMED_CREDIT,
        ClaimStatus::Unverified | ClaimStatus::Unverifiable => NEUTRAL_CREDIT,
        ClaimStatus::Disputed => -DISPUTED_PENALTY,
        ClaimStatus::Refuted => -REFUTED_PENALTY,
    }
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Mean contribution over `total` claims, clamped to `[0, 1]`.
/// Zero claims yield zero.
pub fn confidence_from_sum(sum: f64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp01(sum / total as f64)
}
