use std::time::Duration;

use scoring::Narrative;
use tracing::{debug, warn};

use crate::{extract_summary, Findings, NarrativeGenerator};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Asks the generator for a summary, falling back to `fallback` when there
/// is no generator, the call errors or times out, or its output holds no
/// usable summary. Never fails.
pub async fn narrate(
    generator: Option<&dyn NarrativeGenerator>,
    findings: &Findings,
    fallback: String,
    timeout: Duration,
) -> Narrative {
    let Some(generator) = generator else {
        debug!(subject = %findings.subject, "no narrative generator configured");
        return Narrative::template(fallback);
    };

    let provider = generator.info().name;
    match tokio::time::timeout(timeout, generator.summarize(findings)).await {
        Ok(Ok(raw)) => match extract_summary(&raw) {
            Some(text) => Narrative::generated(text),
            None => {
                warn!(%provider, subject = %findings.subject, "narrative output unusable, using template");
                Narrative::template(fallback)
            }
        },
        Ok(Err(e)) => {
            warn!(%provider, subject = %findings.subject, "narrative generation failed: {e:?}");
            Narrative::template(fallback)
        }
        Err(_) => {
            warn!(%provider, subject = %findings.subject, timeout_ms = timeout.as_millis() as u64, "narrative generation timed out");
            Narrative::template(fallback)
        }
    }
}
