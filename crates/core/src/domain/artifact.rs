use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One object listed from the research bucket. Names follow the
/// `{dataset}/{ID}...{YYYY-MM-DD}...{ext}` convention; immutable once listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    pub updated: DateTime<Utc>,
}

/// Temporal selector for artifact lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsOf {
    Latest,
    Date(NaiveDate),
}

impl AsOf {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        if s == "latest" {
            return Ok(Self::Latest);
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("as_of must be 'latest' or YYYY-MM-DD (got {s})"))?;
        Ok(Self::Date(date))
    }
}

/// Uniform response wrapper for a resolved artifact. `metrics` is only
/// present for structured bodies; `summary_md` is always serialized so
/// clients can rely on the key.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactEnvelope {
    pub dataset: String,
    pub id: String,
    pub as_of: String,
    pub summary_md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Value>,
    pub artifact_url: String,
    pub source: &'static str,
    pub disclaimer: &'static str,
}
