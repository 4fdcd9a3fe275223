use crate::domain::signal::{OptionType, SignalRow};
use anyhow::Context;
use chrono::NaiveDate;
use sqlx::PgPool;

/// Explicit column list so `SELECT` stays in lockstep with `SignalRow`.
const ROW_COLUMNS: &str = "run_date, ticker, option_type, expiration_date, days_to_expiration, \
     setup_quality_signal, is_trend_aligned, is_iv_favorable, strike_price, underlying_price, \
     delta, implied_volatility, iv_rank, signal_score, notes";

/// Equality filters applied in the warehouse before any in-process ranking.
#[derive(Debug, Clone)]
pub struct RowFilter {
    pub run_date: NaiveDate,
    pub ticker: Option<String>,
    pub option_type: Option<OptionType>,
    pub expiration_date: Option<NaiveDate>,
}

/// Most recent run date present in the signals table, `None` when empty.
pub async fn latest_run_date(pool: &PgPool) -> anyhow::Result<Option<NaiveDate>> {
    let latest: Option<NaiveDate> =
        sqlx::query_scalar("SELECT MAX(run_date) FROM options_analysis_signals")
            .fetch_one(pool)
            .await
            .context("query MAX(run_date) failed")?;
    Ok(latest)
}

/// Distinct tickers for a run date, optionally narrowed by an uppercase
/// ticker prefix and a contract side, ordered by ticker.
pub async fn distinct_tickers(
    pool: &PgPool,
    run_date: NaiveDate,
    ticker_prefix: Option<&str>,
    option_type: Option<OptionType>,
    limit: i64,
) -> anyhow::Result<Vec<String>> {
    let mut qb = sqlx::QueryBuilder::new(
        "SELECT DISTINCT ticker FROM options_analysis_signals WHERE run_date = ",
    );
    qb.push_bind(run_date);

    if let Some(prefix) = ticker_prefix {
        qb.push(" AND ticker LIKE ");
        qb.push_bind(format!("{}%", prefix.to_uppercase()));
    }
    if let Some(option_type) = option_type {
        qb.push(" AND option_type = ");
        qb.push_bind(option_type.as_str());
    }

    qb.push(" ORDER BY ticker LIMIT ");
    qb.push_bind(limit);

    let tickers: Vec<String> = qb
        .build_query_scalar()
        .fetch_all(pool)
        .await
        .context("query distinct signal tickers failed")?;
    Ok(tickers)
}

/// Signal rows matching the filter, in warehouse order. Ranking happens in
/// process so the ordering policy stays testable without a database.
pub async fn fetch_rows(pool: &PgPool, filter: &RowFilter) -> anyhow::Result<Vec<SignalRow>> {
    let mut qb = sqlx::QueryBuilder::new(format!(
        "SELECT {ROW_COLUMNS} FROM options_analysis_signals WHERE run_date = "
    ));
    qb.push_bind(filter.run_date);

    if let Some(ticker) = filter.ticker.as_deref() {
        qb.push(" AND ticker = ");
        qb.push_bind(ticker);
    }
    if let Some(option_type) = filter.option_type {
        qb.push(" AND option_type = ");
        qb.push_bind(option_type.as_str());
    }
    if let Some(expiration_date) = filter.expiration_date {
        qb.push(" AND expiration_date = ");
        qb.push_bind(expiration_date);
    }

    let rows = qb
        .build_query_as::<SignalRow>()
        .fetch_all(pool)
        .await
        .context("query options signals failed")?;
    Ok(rows)
}
