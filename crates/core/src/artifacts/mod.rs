pub mod envelope;
pub mod policy;
pub mod select;

use crate::domain::artifact::{AsOf, StoredObject};
use crate::store::ObjectStore;
use anyhow::Result;

/// Physical datasets searched for the legacy `key-levels` name, in order.
const KEY_LEVELS_ALIASES: [&str; 2] = ["technicals-analysis", "technicals"];

/// Lists every stored object that could satisfy `(dataset, id)`.
///
/// Identifiers are case-normalized to uppercase before the prefix search.
/// An empty result is a normal outcome, not an error.
pub async fn list_candidates(
    store: &dyn ObjectStore,
    dataset: &str,
    id: &str,
) -> Result<Vec<StoredObject>> {
    let id_upper = id.to_uppercase();

    let datasets: &[&str] = if dataset == "key-levels" {
        &KEY_LEVELS_ALIASES
    } else {
        std::slice::from_ref(&dataset)
    };

    let mut objects = Vec::new();
    for ds in datasets {
        let prefix = format!("{ds}/{id_upper}");
        tracing::info!(%prefix, "listing artifact candidates");
        objects.extend(store.list(&prefix).await?);
    }
    Ok(objects)
}

/// Locates and selects the single best artifact for the request, applying
/// the dataset's extension policy and the `as_of` selector.
pub async fn find_best_artifact(
    store: &dyn ObjectStore,
    dataset: &str,
    id: &str,
    as_of: AsOf,
) -> Result<Option<select::Candidate>> {
    let objects = list_candidates(store, dataset, id).await?;
    if objects.is_empty() {
        return Ok(None);
    }
    let policy = policy::preferred_extensions(dataset);
    Ok(select::select_best(objects, policy, as_of))
}
