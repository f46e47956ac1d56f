use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ensure_within;
use crate::{CategoryScore, Result, ScoringWeights};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Weighted average of category confidences on a 0..=100 scale.
///
/// Only categories with claims take part; a missing category shrinks the
/// denominator instead of dragging the score down.
pub fn overall_score(categories: &[CategoryScore], weights: &ScoringWeights) -> Result<u8> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for cat in categories.iter().filter(|c| c.total_claims > 0) {
        ensure_within(
            cat.category.as_str(),
            cat.category_confidence,
            0.0,
            1.0,
        )?;
        let w = weights.effective(cat.category);
        weighted += cat.category_confidence * w * 100.0;
        total_weight += w;
    }

    if total_weight <= 0.0 {
        return Ok(0);
    }

    let score = (weighted / total_weight).round();
    ensure_within("overall_score", score, 0.0, 100.0)?;
    debug!(score, categories = categories.len(), "overall score computed");

    Ok(score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::ClaimCategory;

    fn cat(category: ClaimCategory, total: usize, confidence: f64) -> CategoryScore {
        CategoryScore {
            category,
            total_claims: total,
            confirmed_claims: 0,
            disputed_claims: 0,
            refuted_claims: 0,
            unverified_claims: 0,
            category_confidence: confidence,
            flagged_issues: vec![],
        }
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(75), Grade::B);
        assert_eq!(Grade::from_score(74), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::C);
        assert_eq!(Grade::from_score(59), Grade::D);
        assert_eq!(Grade::from_score(40), Grade::D);
        assert_eq!(Grade::from_score(39), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn weighted_average_over_present_categories() {
        let weights = ScoringWeights::default();
        // revenue 1.5 @ 1.0, competitive 0.8 @ 0.5
        let cats = vec![
            cat(ClaimCategory::RevenueMetrics, 3, 1.0),
            cat(ClaimCategory::Competitive, 2, 0.5),
        ];
        // (150 + 40) / 2.3 = 82.6
        assert_eq!(overall_score(&cats, &weights).unwrap(), 83);
    }

    #[test]
    fn single_category_is_its_confidence() {
        let cats = vec![cat(ClaimCategory::Fundraising, 1, 0.42)];
        assert_eq!(overall_score(&cats, &ScoringWeights::default()).unwrap(), 42);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(overall_score(&[], &ScoringWeights::default()).unwrap(), 0);
        let zero_claims = vec![cat(ClaimCategory::Traction, 0, 0.0)];
        assert_eq!(overall_score(&zero_claims, &ScoringWeights::default()).unwrap(), 0);
    }

    #[test]
    fn escaped_confidence_fails_loudly() {
        let cats = vec![cat(ClaimCategory::Traction, 1, 1.4)];
        assert!(overall_score(&cats, &ScoringWeights::default()).is_err());
    }
}
