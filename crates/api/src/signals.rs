use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderName};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use profitscout_core::domain::signal::{OptionType, SignalRow};
use profitscout_core::signals;
use profitscout_core::warehouse::{self, RowFilter};

use crate::error::ApiError;
use crate::{AppState, CACHE_ITEM, CACHE_LISTING, SIGNALS_DATASET};

fn require_pool(state: &AppState) -> Result<&PgPool, ApiError> {
    state.pool.as_ref().ok_or(ApiError::Unavailable)
}

/// Resolves `latest` via the warehouse; anything else must be a plain date.
async fn resolve_as_of(pool: &PgPool, as_of: &str) -> Result<NaiveDate, ApiError> {
    if as_of == "latest" {
        let latest = warehouse::latest_run_date(pool)
            .await
            .map_err(ApiError::internal)?;
        return Ok(signals::resolve_run_date(latest, chrono::Utc::now()));
    }
    NaiveDate::parse_from_str(as_of, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("as_of must be 'latest' or YYYY-MM-DD (got {as_of})"))
    })
}

fn default_as_of() -> String {
    "latest".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    run_date: Option<String>,
    ticker: Option<String>,
    option_type: Option<OptionType>,
    #[serde(default = "default_list_limit")]
    limit: i64,
}

fn default_list_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct TickerRef {
    pub id: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct TickerListing {
    pub dataset: &'static str,
    pub items: Vec<TickerRef>,
}

pub async fn list_tickers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<([(HeaderName, &'static str); 1], Json<TickerListing>), ApiError> {
    let pool = require_pool(&state)?;
    let run_date = resolve_as_of(pool, params.run_date.as_deref().unwrap_or("latest")).await?;

    let tickers = warehouse::distinct_tickers(
        pool,
        run_date,
        params.ticker.as_deref(),
        params.option_type,
        params.limit,
    )
    .await
    .map_err(ApiError::internal)?;

    let items = tickers
        .into_iter()
        .map(|ticker| {
            let href = format!("/v1/{SIGNALS_DATASET}/{ticker}");
            TickerRef { id: ticker, href }
        })
        .collect();

    Ok((
        [(header::CACHE_CONTROL, CACHE_LISTING)],
        Json(TickerListing {
            dataset: SIGNALS_DATASET,
            items,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    #[serde(default = "default_as_of")]
    as_of: String,
    option_type: Option<OptionType>,
    #[serde(default = "default_top_limit")]
    limit: usize,
}

fn default_top_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct TopListing {
    pub dataset: &'static str,
    pub as_of: NaiveDate,
    pub items: Vec<SignalRow>,
}

pub async fn top_signals(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Result<([(HeaderName, &'static str); 1], Json<TopListing>), ApiError> {
    let pool = require_pool(&state)?;
    let run_date = resolve_as_of(pool, &params.as_of).await?;

    let filter = RowFilter {
        run_date,
        ticker: None,
        option_type: params.option_type,
        expiration_date: None,
    };
    let rows = warehouse::fetch_rows(pool, &filter)
        .await
        .map_err(ApiError::internal)?;
    let items = signals::rank(rows, params.limit);

    Ok((
        [(header::CACHE_CONTROL, CACHE_LISTING)],
        Json(TopListing {
            dataset: "options-signals-top",
            as_of: run_date,
            items,
        }),
    ))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionTypeFilter {
    Call,
    Put,
    #[default]
    Any,
}

impl OptionTypeFilter {
    fn as_option(self) -> Option<OptionType> {
        match self {
            Self::Call => Some(OptionType::Call),
            Self::Put => Some(OptionType::Put),
            Self::Any => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TickerParams {
    #[serde(default = "default_as_of")]
    as_of: String,
    expiration_date: Option<NaiveDate>,
    #[serde(default)]
    option_type: OptionTypeFilter,
    #[serde(default = "default_top_n")]
    top_n: usize,
}

fn default_top_n() -> usize {
    3
}

#[derive(Debug, Serialize)]
pub struct TickerSignals {
    pub dataset: &'static str,
    pub id: String,
    pub as_of: NaiveDate,
    pub selected_expiration_date: NaiveDate,
    pub items: Vec<SignalRow>,
}

pub async fn ticker_signals(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(params): Query<TickerParams>,
) -> Result<([(HeaderName, &'static str); 1], Json<TickerSignals>), ApiError> {
    let pool = require_pool(&state)?;
    let ticker = ticker.to_uppercase();
    let run_date = resolve_as_of(pool, &params.as_of).await?;

    let base = RowFilter {
        run_date,
        ticker: Some(ticker.clone()),
        option_type: params.option_type.as_option(),
        expiration_date: None,
    };

    let expiration = match params.expiration_date {
        Some(date) => date,
        None => {
            let candidates = warehouse::fetch_rows(pool, &base)
                .await
                .map_err(ApiError::internal)?;
            signals::resolve_expiration(&candidates).ok_or_else(|| {
                ApiError::not_found(
                    "Item not found.",
                    format!("No options signals found for ticker {ticker} on {run_date}."),
                )
            })?
        }
    };

    let filter = RowFilter {
        expiration_date: Some(expiration),
        ..base
    };
    let rows = warehouse::fetch_rows(pool, &filter)
        .await
        .map_err(ApiError::internal)?;

    if rows.is_empty() {
        return Err(ApiError::not_found(
            "Item not found.",
            format!(
                "No options signals found for {ticker} on {run_date} with expiration {expiration}."
            ),
        ));
    }

    let items = signals::rank(rows, params.top_n);

    Ok((
        [(header::CACHE_CONTROL, CACHE_ITEM)],
        Json(TickerSignals {
            dataset: "options-signals-item",
            id: ticker,
            as_of: run_date,
            selected_expiration_date: expiration,
            items,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_type_filter_defaults_to_any() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default)]
            option_type: OptionTypeFilter,
        }
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.option_type, OptionTypeFilter::Any);
        assert_eq!(probe.option_type.as_option(), None);
    }

    #[test]
    fn option_type_filter_parses_wire_casing() {
        let call: OptionTypeFilter = serde_json::from_str("\"CALL\"").unwrap();
        assert_eq!(call.as_option(), Some(OptionType::Call));
        let put: OptionTypeFilter = serde_json::from_str("\"PUT\"").unwrap();
        assert_eq!(put.as_option(), Some(OptionType::Put));
        assert!(serde_json::from_str::<OptionTypeFilter>("\"STRADDLE\"").is_err());
    }
}
