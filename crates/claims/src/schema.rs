use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type ClaimId = String;
pub type ApplicationId = String;

/// The nine topical buckets an extracted claim belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    RevenueMetrics,
    UserCustomer,
    TeamBackground,
    MarketSize,
    Competitive,
    TechnologyIp,
    CustomerReference,
    Traction,
    Fundraising,
}

impl ClaimCategory {
    pub const ALL: [ClaimCategory; 9] = [
        ClaimCategory::RevenueMetrics,
        ClaimCategory::UserCustomer,
        ClaimCategory::TeamBackground,
        ClaimCategory::MarketSize,
        ClaimCategory::Competitive,
        ClaimCategory::TechnologyIp,
        ClaimCategory::CustomerReference,
        ClaimCategory::Traction,
        ClaimCategory::Fundraising,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimCategory::RevenueMetrics => "revenue_metrics",
            ClaimCategory::UserCustomer => "user_customer",
            ClaimCategory::TeamBackground => "team_background",
            ClaimCategory::MarketSize => "market_size",
            ClaimCategory::Competitive => "competitive",
            ClaimCategory::TechnologyIp => "technology_ip",
            ClaimCategory::CustomerReference => "customer_reference",
            ClaimCategory::Traction => "traction",
            ClaimCategory::Fundraising => "fundraising",
        }
    }
}

impl std::fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Unverified,
    Unverifiable,
    Confirmed,
    AiVerified,
    Disputed,
    Refuted,
}

impl ClaimStatus {
    /// Confirmed by a human or by automated verification.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ClaimStatus::Confirmed | ClaimStatus::AiVerified)
    }

    /// Not (or not able to be) checked against outside evidence.
    pub fn is_unverified(&self) -> bool {
        matches!(self, ClaimStatus::Unverified | ClaimStatus::Unverifiable)
    }
}

/// Claim priority. Also used as the severity scale of omissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

pub type OmissionSeverity = Priority;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkFlag {
    AboveBenchmark,
    BelowBenchmark,
    Unrealistic,
    #[default]
    #[serde(rename = "none")]
    Unflagged,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub application_id: ApplicationId,
    pub category: ClaimCategory,
    pub statement: String,

    // Verification verdict; written once by the verifier
    #[serde(default)]
    pub status: ClaimStatus,
    #[serde(default)]
    pub benchmark_flag: BenchmarkFlag,
    /// Set when a verdict was recorded, even one that left the status as `unverified`.
    #[serde(default)]
    pub verified: bool,

    pub priority: Priority,
    /// Ids of claims this one conflicts with. Never nested claims.
    #[serde(default)]
    pub contradicts: BTreeSet<ClaimId>,
}

impl Claim {
    /// New, not yet verified claim.
    pub fn new(
        id: impl Into<ClaimId>,
        application_id: impl Into<ApplicationId>,
        category: ClaimCategory,
        priority: Priority,
        statement: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            application_id: application_id.into(),
            category,
            statement: statement.into(),
            status: ClaimStatus::Unverified,
            benchmark_flag: BenchmarkFlag::Unflagged,
            verified: false,
            priority,
            contradicts: BTreeSet::new(),
        }
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_benchmark(mut self, flag: BenchmarkFlag) -> Self {
        self.benchmark_flag = flag;
        self
    }

    pub fn contradicting(mut self, other: impl Into<ClaimId>) -> Self {
        self.contradicts.insert(other.into());
        self
    }

    /// A claim counts as verified once a verdict was recorded, its status
    /// left `unverified`, or a benchmark comparison was attached.
    pub fn is_verified(&self) -> bool {
        self.verified
            || self.status != ClaimStatus::Unverified
            || self.benchmark_flag != BenchmarkFlag::Unflagged
    }
}

/// Information the applicant was expected to disclose but did not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Omission {
    pub category: ClaimCategory,
    pub severity: OmissionSeverity,
    pub description: String,
}

/// Outcome of verifying a single claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub status: ClaimStatus,
    #[serde(default)]
    pub benchmark_flag: BenchmarkFlag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        let claim = Claim::new("c1", "app-1", ClaimCategory::TechnologyIp, Priority::High, "Two patents filed")
            .with_status(ClaimStatus::AiVerified)
            .contradicting("c2");

        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["category"], "technology_ip");
        assert_eq!(json["status"], "ai_verified");
        assert_eq!(json["benchmark_flag"], "none");
        assert_eq!(json["contradicts"], serde_json::json!(["c2"]));
    }

    #[test]
    fn missing_verdict_fields_default_to_unverified() {
        let raw = r#"{
            "id": "c9",
            "application_id": "app-1",
            "category": "traction",
            "statement": "40% MoM growth",
            "priority": "critical"
        }"#;
        let claim: Claim = serde_json::from_str(raw).unwrap();
        assert_eq!(claim.status, ClaimStatus::Unverified);
        assert_eq!(claim.benchmark_flag, BenchmarkFlag::Unflagged);
        assert!(claim.contradicts.is_empty());
        assert!(!claim.verified);
        assert!(!claim.is_verified());
    }

    #[test]
    fn status_groups() {
        assert!(ClaimStatus::Confirmed.is_confirmed());
        assert!(ClaimStatus::AiVerified.is_confirmed());
        assert!(ClaimStatus::Unverifiable.is_unverified());
        assert!(!ClaimStatus::Disputed.is_unverified());
        assert!(!ClaimStatus::Refuted.is_confirmed());
    }
}
