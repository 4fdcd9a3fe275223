use crate::config::Settings;
use crate::domain::artifact::StoredObject;
use crate::store::ObjectStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GCS JSON API client. Holds no mutable state; `reqwest::Client` is an
/// `Arc` internally so clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GcsObjectStore {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ListedObject>,
    #[serde(default)]
    prefixes: Vec<String>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    updated: DateTime<Utc>,
}

impl GcsObjectStore {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .storage_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("STORAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build object store http client")?;

        Ok(Self {
            http,
            base_url,
            bucket: settings.storage_bucket.clone(),
            access_token: settings.storage_access_token.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.access_token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }
        Ok(headers)
    }

    fn list_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o",
            self.base_url.trim_end_matches('/'),
            self.bucket
        )
    }

    async fn list_page(&self, query: &[(&str, &str)]) -> Result<ListResponse> {
        let res = self
            .http
            .get(self.list_url())
            .headers(self.headers()?)
            .query(query)
            .send()
            .await
            .context("object listing request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read object listing response")?;
        if !status.is_success() {
            anyhow::bail!("object store HTTP {status}: {text}");
        }

        serde_json::from_str(&text)
            .with_context(|| format!("unexpected object listing payload: {text}"))
    }
}

#[async_trait::async_trait]
impl ObjectStore for GcsObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("prefix", prefix),
                ("fields", "items(name,updated),nextPageToken"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page = self.list_page(&query).await?;
            objects.extend(page.items.into_iter().map(|o| StoredObject {
                name: o.name,
                updated: o.updated,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(objects)
    }

    async fn list_prefixes(&self) -> Result<Vec<String>> {
        let mut prefixes = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("delimiter", "/"), ("fields", "prefixes,nextPageToken")];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page = self.list_page(&query).await?;
            prefixes.extend(page.prefixes);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(prefixes)
    }

    async fn download(&self, name: &str) -> Result<String> {
        let url = self.object_url(name);
        let res = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .with_context(|| format!("object download request failed for {name}"))?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("object store HTTP {status} downloading {name}");
        }

        res.text()
            .await
            .with_context(|| format!("failed to read object body for {name}"))
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            name
        )
    }
}
