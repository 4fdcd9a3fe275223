pub mod artifacts;
pub mod domain;
pub mod signals;
pub mod store;
pub mod warehouse;

pub mod config {
    use anyhow::Context;

    const DEFAULT_STORAGE_BUCKET: &str = "profit-scout-data";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub storage_bucket: String,
        pub storage_base_url: Option<String>,
        pub storage_access_token: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                storage_bucket: std::env::var("STORAGE_BUCKET")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
                storage_base_url: std::env::var("STORAGE_BASE_URL").ok(),
                storage_access_token: std::env::var("STORAGE_ACCESS_TOKEN").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }
    }
}
