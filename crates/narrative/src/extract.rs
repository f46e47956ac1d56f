/// Pulls the summary out of generator output.
///
/// Generators tend to wrap JSON in prose or code fences, so this takes the
/// outermost `{ ... }` span and reads its `summary` field. Anything else is
/// treated as unusable.
pub fn extract_summary(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(&raw[start..=end]).ok()?;
    let summary = value.get("summary")?.as_str()?.trim();
    if summary.is_empty() {
        None
    } else {
        Some(summary.to_string())
    }
}
