use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderName};
use axum::Json;
use serde::{Deserialize, Serialize};

use profitscout_core::artifacts::{self, envelope};
use profitscout_core::domain::artifact::{ArtifactEnvelope, AsOf};

use crate::error::ApiError;
use crate::{AppState, CACHE_ITEM, CACHE_LISTING, SIGNALS_DATASET};

/// Served when the storage namespace enumeration comes back empty.
const FALLBACK_DATASETS: [&str; 4] = [
    "recommendations",
    "key-levels",
    "technicals",
    SIGNALS_DATASET,
];

/// Internal prefix hidden from the discovery listing.
const MANIFESTS_PREFIX: &str = "manifests";

#[derive(Debug, Deserialize)]
pub struct ArtifactParams {
    #[serde(default = "default_as_of")]
    as_of: String,
}

fn default_as_of() -> String {
    "latest".to_string()
}

pub async fn get_artifact(
    State(state): State<AppState>,
    Path((dataset, id)): Path<(String, String)>,
    Query(params): Query<ArtifactParams>,
) -> Result<([(HeaderName, &'static str); 1], Json<ArtifactEnvelope>), ApiError> {
    let as_of = AsOf::parse(&params.as_of).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let best = artifacts::find_best_artifact(state.store.as_ref(), &dataset, &id, as_of)
        .await
        .map_err(ApiError::internal)?;

    let Some(candidate) = best else {
        return Err(ApiError::not_found(
            "Item not found.",
            format!(
                "No {dataset} artifact for ID={} (as_of={}).",
                id.to_uppercase(),
                params.as_of
            ),
        ));
    };

    let content = state
        .store
        .download(&candidate.object.name)
        .await
        .map_err(ApiError::internal)?;
    let artifact_url = state.store.object_url(&candidate.object.name);

    let envelope = envelope::build_envelope(
        &dataset,
        &id.to_uppercase(),
        &candidate.object,
        candidate.date,
        artifact_url,
        content,
    );

    Ok(([(header::CACHE_CONTROL, CACHE_ITEM)], Json(envelope)))
}

#[derive(Debug, Serialize)]
pub struct DatasetListing {
    pub datasets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

pub async fn list_datasets(
    State(state): State<AppState>,
) -> Result<([(HeaderName, &'static str); 1], Json<DatasetListing>), ApiError> {
    let prefixes = state
        .store
        .list_prefixes()
        .await
        .map_err(ApiError::internal)?;

    let mut datasets: Vec<String> = prefixes
        .into_iter()
        .map(|p| p.trim_matches('/').to_string())
        .filter(|p| !p.is_empty() && p != MANIFESTS_PREFIX)
        .collect();

    let listing = if datasets.is_empty() {
        DatasetListing {
            datasets: FALLBACK_DATASETS.iter().map(|s| s.to_string()).collect(),
            hint: Some("fallback"),
        }
    } else {
        datasets.push(SIGNALS_DATASET.to_string());
        datasets.sort();
        DatasetListing {
            datasets,
            hint: None,
        }
    };

    Ok(([(header::CACHE_CONTROL, CACHE_LISTING)], Json(listing)))
}
