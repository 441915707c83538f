use serde::de::DeserializeOwned;

/// Pulls the outermost `{...}` out of a model reply (which may be wrapped in
/// prose or a markdown fence) and decodes it as `T`.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> anyhow::Result<T> {
    let start = text.find('{');
    let end = text.rfind('}');
    let slice = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => anyhow::bail!("no JSON object found in completion"),
    };
    Ok(serde_json::from_str(slice)?)
}
