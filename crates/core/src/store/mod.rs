pub mod gcs;

use crate::domain::artifact::StoredObject;
use anyhow::Result;

/// Read-only view of the flat research-object namespace.
///
/// Handlers take this as an explicit dependency so tests can substitute an
/// in-memory double. Implementations must be safe to share across
/// concurrent requests.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Objects whose name starts with `prefix`, in storage order.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>>;

    /// Top-level namespace prefixes (the dataset directories).
    async fn list_prefixes(&self) -> Result<Vec<String>>;

    /// Object body as UTF-8 text.
    async fn download(&self, name: &str) -> Result<String>;

    /// Publicly shareable URL for an object.
    fn object_url(&self, name: &str) -> String;
}
