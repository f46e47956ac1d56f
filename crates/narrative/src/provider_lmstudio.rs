use anyhow::Context;
use async_trait::async_trait;

use crate::provider::{Findings, FindingsKind, NarrativeGenerator, ProviderInfo};

/// Narrator backed by an OpenAI-compatible chat completions endpoint
/// (LM Studio by default).
pub struct LmStudioNarrator {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl LmStudioNarrator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

pub(crate) fn prompt(findings: &Findings) -> String {
    let audience = match findings.kind {
        FindingsKind::Diligence => "an investment committee reviewing a startup application",
        FindingsKind::Calibration => "the team maintaining an automated diligence scorer",
    };
    format!(
        "Write a short summary for {audience}.\n\
         Subject: {}\n\
         Headline: {}\n\
         Facts (JSON): {}\n\
         Use only the facts given; do not change any number.\n\
         Reply with JSON of the form {{\"summary\": \"...\"}}.",
        findings.subject, findings.headline, findings.facts
    )
}

#[async_trait]
impl NarrativeGenerator for LmStudioNarrator {
    async fn summarize(&self, findings: &Findings) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt(findings)}],
            "temperature": 0.2
        });

        let url = format!("{}/v1/chat/completions", self.base_url);
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("narrative request failed")?
            .error_for_status()?;
        let json: serde_json::Value = resp.json().await?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .context("narrative response has no message content")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let url = format!("{}/v1/models", self.base_url);
        self.client.get(url).send().await?.error_for_status()?;
        Ok(())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "lmstudio".to_string(),
            base_url: self.base_url.clone(),
        }
    }
}
