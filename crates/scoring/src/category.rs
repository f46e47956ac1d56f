use std::collections::BTreeMap;

use claims::{Claim, ClaimCategory, ClaimStatus, Priority};
use serde::{Deserialize, Serialize};

use crate::primitives::{confidence_from_sum, contribution};

/// Per-category roll-up of claim verdicts. Derived on every report run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ClaimCategory,
    pub total_claims: usize,
    pub confirmed_claims: usize,
    pub disputed_claims: usize,
    pub refuted_claims: usize,
    pub unverified_claims: usize,
    /// In `[0, 1]`.
    pub category_confidence: f64,
    pub flagged_issues: Vec<String>,
}

#[derive(Default)]
struct Tally {
    total: usize,
    confirmed: usize,
    disputed: usize,
    refuted: usize,
    unverified: usize,
    critical_unverified: usize,
    sum: f64,
}

impl Tally {
    fn add(&mut self, claim: &Claim) {
        self.total += 1;
        self.sum += contribution(claim.status);
        let status = claim.status;
        if status.is_confirmed() {
            self.confirmed += 1;
        } else if status.is_unverified() {
            self.unverified += 1;
            if claim.priority == Priority::Critical {
                self.critical_unverified += 1;
            }
        } else if status == ClaimStatus::Disputed {
            self.disputed += 1;
        } else {
            self.refuted += 1;
        }
    }

    fn into_score(self, category: ClaimCategory) -> CategoryScore {
        let mut flagged_issues = Vec::new();
        if self.refuted > 0 {
            flagged_issues.push(format!("{} refuted claim(s)", self.refuted));
        }
        if self.disputed > 0 {
            flagged_issues.push(format!("{} disputed claim(s)", self.disputed));
        }
        if self.critical_unverified > 0 {
            flagged_issues.push(format!(
                "{} critical claim(s) not verified",
                self.critical_unverified
            ));
        }

        CategoryScore {
            category,
            total_claims: self.total,
            confirmed_claims: self.confirmed,
            disputed_claims: self.disputed,
            refuted_claims: self.refuted,
            unverified_claims: self.unverified,
            category_confidence: confidence_from_sum(self.sum, self.total),
            flagged_issues,
        }
    }
}

/// Groups claims by category. Categories without claims are left out, so
/// the result holds between 0 and 9 entries in [`ClaimCategory::ALL`] order.
pub fn aggregate_categories(claims: &[Claim]) -> Vec<CategoryScore> {
    let mut tallies: BTreeMap<ClaimCategory, Tally> = BTreeMap::new();
    for claim in claims {
        tallies.entry(claim.category).or_default().add(claim);
    }

    ClaimCategory::ALL
        .iter()
        .filter_map(|cat| tallies.remove(cat).map(|t| t.into_score(*cat)))
        .collect()
}
