use anyhow::{Context, Result};
use calibration::{FeedbackEntry, InMemoryFeedbackStore};
use claims::{ApplicationId, Claim, InMemoryClaimStore, Omission};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct SeedApplication {
    pub id: ApplicationId,
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub omissions: Vec<Omission>,
}

/// Startup data: applications with their claims, plus historical feedback.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub applications: Vec<SeedApplication>,
    #[serde(default)]
    pub feedback: Vec<FeedbackEntry>,
}

impl Seed {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("seed file is not valid JSON")
    }

    pub fn load_into(self, claims: &InMemoryClaimStore, feedback: &InMemoryFeedbackStore) -> Result<()> {
        let apps = self.applications.len();
        let entries = self.feedback.len();

        for app in self.applications {
            claims
                .put_claims(&app.id, app.claims)
                .with_context(|| format!("seed claims for {}", app.id))?;
            claims
                .put_omissions(&app.id, app.omissions)
                .with_context(|| format!("seed omissions for {}", app.id))?;
        }
        for entry in self.feedback {
            let report_id = entry.report_id.clone();
            feedback
                .add_feedback(entry)
                .with_context(|| format!("seed feedback for report {report_id}"))?;
        }

        info!(applications = apps, feedback = entries, "seed loaded");
        Ok(())
    }
}

pub async fn load_seed(path: &str, claims: &InMemoryClaimStore, feedback: &InMemoryFeedbackStore) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {path}"))?;
    Seed::parse(&raw)?.load_into(claims, feedback)
}
