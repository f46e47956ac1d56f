use serde::{Deserialize, Serialize};

use crate::Grade;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Invest,
    ConditionalInvest,
    NeedsMoreInfo,
    Pass,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Invest => "invest",
            Recommendation::ConditionalInvest => "conditional_invest",
            Recommendation::NeedsMoreInfo => "needs_more_info",
            Recommendation::Pass => "pass",
        }
    }
}

/// Investment verdict from the grade and the critical/high flag counts.
pub fn recommend(grade: Grade, critical: usize, high: usize) -> Recommendation {
    match grade {
        Grade::A | Grade::B if critical == 0 && high <= 1 => Recommendation::Invest,
        Grade::A | Grade::B | Grade::C => Recommendation::ConditionalInvest,
        Grade::D if critical + high <= 2 => Recommendation::NeedsMoreInfo,
        Grade::D | Grade::F => Recommendation::Pass,
    }
}
