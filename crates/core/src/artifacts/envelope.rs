use crate::domain::artifact::{ArtifactEnvelope, StoredObject};
use chrono::NaiveDate;
use serde_json::Value;

pub const SOURCE: &str = "ProfitScout";
pub const DISCLAIMER: &str = "Educational only; not investment advice.";

/// Structured bodies may carry their narrative under either key; the first
/// present wins and is lifted out of `metrics`.
const NARRATIVE_KEYS: [&str; 2] = ["analysis", "summary_md"];

/// Wraps a resolved artifact body into the uniform response shape.
///
/// `.md`/`.txt` bodies are returned verbatim as narrative. `.json` bodies are
/// decoded; a decode failure degrades to narrative text instead of failing
/// the request.
pub fn build_envelope(
    dataset: &str,
    id: &str,
    object: &StoredObject,
    embedded_date: Option<NaiveDate>,
    artifact_url: String,
    content: String,
) -> ArtifactEnvelope {
    let as_of_date = embedded_date.unwrap_or_else(|| object.updated.date_naive());

    let mut envelope = ArtifactEnvelope {
        dataset: dataset.to_string(),
        id: id.to_string(),
        as_of: format!("{}T00:00:00Z", as_of_date.format("%Y-%m-%d")),
        summary_md: None,
        metrics: None,
        artifact_url,
        source: SOURCE,
        disclaimer: DISCLAIMER,
    };

    if !object.name.ends_with(".json") {
        envelope.summary_md = Some(content);
        return envelope;
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(mut map)) => {
            for key in NARRATIVE_KEYS {
                if let Some(value) = map.remove(key) {
                    envelope.summary_md = narrative_text(value);
                    break;
                }
            }
            envelope.metrics = Some(Value::Object(map));
        }
        Ok(other) => envelope.metrics = Some(other),
        Err(error) => {
            tracing::warn!(name = %object.name, %error, "artifact body is not valid JSON; returning as text");
            envelope.summary_md = Some(content);
        }
    }

    envelope
}

fn narrative_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
