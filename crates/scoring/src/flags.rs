use claims::{BenchmarkFlag, Claim, ClaimCategory, ClaimId, ClaimStatus, Omission, Priority};
use serde::{Deserialize, Serialize};

/// Red flag severity. Declaration order is report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSeverity {
    Critical,
    High,
    Medium,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "claim_id", rename_all = "snake_case")]
pub enum FlagSource {
    Claim(ClaimId),
    Omission,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub source: FlagSource,
    pub category: ClaimCategory,
    pub severity: FlagSeverity,
    pub reason: String,
    pub evidence: String,
}

impl RedFlag {
    fn for_claim(claim: &Claim, severity: FlagSeverity, reason: impl Into<String>) -> Self {
        Self {
            source: FlagSource::Claim(claim.id.clone()),
            category: claim.category,
            severity,
            reason: reason.into(),
            evidence: claim.statement.clone(),
        }
    }

    pub fn claim_id(&self) -> Option<&str> {
        match &self.source {
            FlagSource::Claim(id) => Some(id.as_str()),
            FlagSource::Omission => None,
        }
    }
}

fn claim_flags(claim: &Claim, out: &mut Vec<RedFlag>) {
    let critical = claim.priority == Priority::Critical;

    if claim.status == ClaimStatus::Refuted {
        let sev = if critical { FlagSeverity::Critical } else { FlagSeverity::High };
        out.push(RedFlag::for_claim(claim, sev, "Claim was refuted during verification"));
    }

    if claim.status == ClaimStatus::Disputed
        && matches!(claim.priority, Priority::Critical | Priority::High)
    {
        let sev = if critical { FlagSeverity::High } else { FlagSeverity::Medium };
        out.push(RedFlag::for_claim(claim, sev, "High-priority claim is disputed by evidence"));
    }

    if critical && claim.status == ClaimStatus::Unverified {
        out.push(RedFlag::for_claim(
            claim,
            FlagSeverity::Medium,
            "Critical claim has not been verified",
        ));
    }

    if !claim.contradicts.is_empty() {
        let others: Vec<&str> = claim.contradicts.iter().map(String::as_str).collect();
        out.push(RedFlag::for_claim(
            claim,
            FlagSeverity::High,
            format!("Contradicts claim(s) {}", others.join(", ")),
        ));
    }

    if claim.benchmark_flag == BenchmarkFlag::Unrealistic {
        out.push(RedFlag::for_claim(
            claim,
            FlagSeverity::High,
            "Figure is unrealistic against stage benchmarks",
        ));
    }
}

fn omission_flag(omission: &Omission) -> Option<RedFlag> {
    let severity = match omission.severity {
        Priority::Critical => FlagSeverity::High,
        Priority::High => FlagSeverity::Medium,
        Priority::Medium | Priority::Low => return None,
    };
    Some(RedFlag {
        source: FlagSource::Omission,
        category: omission.category,
        severity,
        reason: "Expected information was not disclosed".to_string(),
        evidence: omission.description.clone(),
    })
}

/// Applies every rule to every claim and omission independently; one claim
/// may raise several flags. Output is ordered critical, high, medium and
/// keeps input order within a severity.
pub fn generate_red_flags(claims: &[Claim], omissions: &[Omission]) -> Vec<RedFlag> {
    let mut flags = Vec::new();
    for claim in claims {
        claim_flags(claim, &mut flags);
    }
    flags.extend(omissions.iter().filter_map(omission_flag));
    flags.sort_by_key(|f| f.severity);
    flags
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

impl FlagCounts {
    pub fn of(flags: &[RedFlag]) -> Self {
        flags.iter().fold(Self::default(), |mut acc, f| {
            match f.severity {
                FlagSeverity::Critical => acc.critical += 1,
                FlagSeverity::High => acc.high += 1,
                FlagSeverity::Medium => acc.medium += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(id: &str, prio: Priority, status: ClaimStatus) -> Claim {
        Claim::new(id, "app", ClaimCategory::RevenueMetrics, prio, format!("statement {id}"))
            .with_status(status)
    }

    fn severities(flags: &[RedFlag]) -> Vec<FlagSeverity> {
        flags.iter().map(|f| f.severity).collect()
    }

    #[test]
    fn refuted_severity_depends_on_priority() {
        let flags = generate_red_flags(&[claim("a", Priority::Critical, ClaimStatus::Refuted)], &[]);
        assert_eq!(severities(&flags), vec![FlagSeverity::Critical]);
        assert_eq!(flags[0].claim_id(), Some("a"));
        assert_eq!(flags[0].evidence, "statement a");

        let flags = generate_red_flags(&[claim("b", Priority::Low, ClaimStatus::Refuted)], &[]);
        assert_eq!(severities(&flags), vec![FlagSeverity::High]);
    }

    #[test]
    fn disputed_only_flags_important_claims() {
        let claims = [
            claim("a", Priority::Critical, ClaimStatus::Disputed),
            claim("b", Priority::High, ClaimStatus::Disputed),
            claim("c", Priority::Medium, ClaimStatus::Disputed),
        ];
        let flags = generate_red_flags(&claims, &[]);
        assert_eq!(severities(&flags), vec![FlagSeverity::High, FlagSeverity::Medium]);
    }

    #[test]
    fn critical_unverified_but_not_unverifiable() {
        let claims = [
            claim("a", Priority::Critical, ClaimStatus::Unverified),
            claim("b", Priority::Critical, ClaimStatus::Unverifiable),
        ];
        let flags = generate_red_flags(&claims, &[]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].claim_id(), Some("a"));
    }

    #[test]
    fn one_claim_can_raise_several_flags_sorted() {
        let c = claim("a", Priority::Critical, ClaimStatus::Refuted)
            .contradicting("z")
            .with_benchmark(BenchmarkFlag::Unrealistic);
        let omissions = [Omission {
            category: ClaimCategory::Fundraising,
            severity: Priority::High,
            description: "No cap table".into(),
        }];
        let flags = generate_red_flags(&[c], &omissions);
        assert_eq!(
            severities(&flags),
            vec![
                FlagSeverity::Critical,
                FlagSeverity::High,
                FlagSeverity::High,
                FlagSeverity::Medium
            ]
        );
        assert_eq!(flags[1].reason, "Contradicts claim(s) z");
        assert_eq!(flags[3].source, FlagSource::Omission);
        assert_eq!(flags[3].evidence, "No cap table");
    }

    #[test]
    fn minor_omissions_are_ignored() {
        let omissions = [
            Omission { category: ClaimCategory::Competitive, severity: Priority::Critical, description: "x".into() },
            Omission { category: ClaimCategory::Competitive, severity: Priority::Medium, description: "y".into() },
            Omission { category: ClaimCategory::Competitive, severity: Priority::Low, description: "z".into() },
        ];
        let flags = generate_red_flags(&[], &omissions);
        assert_eq!(severities(&flags), vec![FlagSeverity::High]);
    }

    #[test]
    fn counts() {
        let claims = [
            claim("a", Priority::Critical, ClaimStatus::Refuted),
            claim("b", Priority::Low, ClaimStatus::Refuted),
            claim("c", Priority::Critical, ClaimStatus::Unverified),
        ];
        let counts = FlagCounts::of(&generate_red_flags(&claims, &[]));
        assert_eq!(counts, FlagCounts { critical: 1, high: 1, medium: 1 });
    }

    #[test]
    fn omission_source_wire_shape() {
        let json = serde_json::to_value(FlagSource::Omission).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "omission"}));
        let json = serde_json::to_value(FlagSource::Claim("c7".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "claim", "claim_id": "c7"}));
    }
}
