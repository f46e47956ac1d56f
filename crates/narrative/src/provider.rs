use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub base_url: String,
}

/// What the engine hands to the text generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Findings {
    pub kind: FindingsKind,
    /// Application id or calibration period.
    pub subject: String,
    pub headline: String,
    /// Structured numbers the narrative must stay faithful to.
    pub facts: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingsKind {
    Diligence,
    Calibration,
}

/// Turns structured findings into prose. Output is untrusted free text.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn summarize(&self, findings: &Findings) -> anyhow::Result<String>;
    async fn ping(&self) -> anyhow::Result<()>;
    fn info(&self) -> ProviderInfo;
}
