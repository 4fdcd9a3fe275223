use crate::domain::signal::SignalRow;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cmp::Reverse;
use std::ops::RangeInclusive;

/// Preferred contract horizon, in days to expiration.
pub const DTE_WINDOW: RangeInclusive<i32> = 30..=45;
/// Midpoint target used when nothing lands inside the window.
pub const DTE_TARGET: i32 = 37;

/// Effective run date for a "latest" request: the newest date recorded in
/// the warehouse, else yesterday so the API stays usable before the first
/// batch lands.
pub fn resolve_run_date(latest: Option<NaiveDate>, now_utc: DateTime<Utc>) -> NaiveDate {
    latest.unwrap_or_else(|| (now_utc - Duration::days(1)).date_naive())
}

fn pick_in_window(rows: &[SignalRow]) -> Option<&SignalRow> {
    rows.iter()
        .filter(|r| DTE_WINDOW.contains(&r.days_to_expiration))
        .min_by_key(|r| r.days_to_expiration)
}

fn pick_nearest(rows: &[SignalRow]) -> Option<&SignalRow> {
    // Equidistant candidates resolve to the smaller day count.
    rows.iter()
        .min_by_key(|r| ((r.days_to_expiration - DTE_TARGET).abs(), r.days_to_expiration))
}

/// Target expiration when the caller supplied none: the shortest contract
/// inside the 30-45 day window, else the contract nearest 37 days. `None`
/// only when `rows` is empty.
pub fn resolve_expiration(rows: &[SignalRow]) -> Option<NaiveDate> {
    pick_in_window(rows)
        .or_else(|| pick_nearest(rows))
        .map(|r| r.expiration_date)
}

/// Orders rows by setup quality tier, then trend alignment, then IV
/// favorability, all descending, and truncates to `limit`. Rows equal on
/// all three keys keep their warehouse order, which is unspecified.
pub fn rank(mut rows: Vec<SignalRow>, limit: usize) -> Vec<SignalRow> {
    rows.sort_by_key(|r| {
        Reverse((
            r.quality_tier(),
            r.is_trend_aligned.unwrap_or(false),
            r.is_iv_favorable.unwrap_or(false),
        ))
    });
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_row() -> SignalRow {
        SignalRow {
            run_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            ticker: "AAPL".to_string(),
            option_type: "CALL".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(),
            days_to_expiration: 37,
            setup_quality_signal: None,
            is_trend_aligned: None,
            is_iv_favorable: None,
            strike_price: None,
            underlying_price: None,
            delta: None,
            implied_volatility: None,
            iv_rank: None,
            signal_score: None,
            notes: None,
        }
    }

    fn row_with_dte(dte: i32) -> SignalRow {
        let run = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        SignalRow {
            days_to_expiration: dte,
            expiration_date: run + Duration::days(dte as i64),
            ..base_row()
        }
    }

    fn row_with_signals(
        quality: Option<&str>,
        trend: Option<bool>,
        iv: Option<bool>,
        notes: &str,
    ) -> SignalRow {
        SignalRow {
            setup_quality_signal: quality.map(str::to_string),
            is_trend_aligned: trend,
            is_iv_favorable: iv,
            notes: Some(notes.to_string()),
            ..base_row()
        }
    }

    #[test]
    fn resolve_run_date_passes_through_known_dates() {
        let latest = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap();
        assert_eq!(resolve_run_date(Some(latest), now), latest);
    }

    #[test]
    fn resolve_run_date_falls_back_to_yesterday() {
        let now = Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap();
        assert_eq!(
            resolve_run_date(None, now),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
    }

    #[test]
    fn prefers_shortest_contract_inside_window() {
        let rows = vec![row_with_dte(20), row_with_dte(33), row_with_dte(50)];
        assert_eq!(resolve_expiration(&rows), Some(rows[1].expiration_date));
    }

    #[test]
    fn window_pick_is_minimal_among_in_window_rows() {
        let rows = vec![row_with_dte(44), row_with_dte(31), row_with_dte(38)];
        assert_eq!(resolve_expiration(&rows), Some(rows[1].expiration_date));
    }

    #[test]
    fn falls_back_to_nearest_thirty_seven() {
        // |50-37| = 13 beats |20-37| = 17.
        let rows = vec![row_with_dte(20), row_with_dte(50)];
        assert_eq!(resolve_expiration(&rows), Some(rows[1].expiration_date));
    }

    #[test]
    fn equidistant_fallback_resolves_to_smaller_dte() {
        let rows = vec![row_with_dte(47), row_with_dte(27)];
        assert_eq!(resolve_expiration(&rows), Some(rows[1].expiration_date));
    }

    #[test]
    fn empty_rows_resolve_to_none() {
        assert_eq!(resolve_expiration(&[]), None);
    }

    #[test]
    fn any_nonempty_row_set_resolves() {
        let rows = vec![row_with_dte(300)];
        assert_eq!(resolve_expiration(&rows), Some(rows[0].expiration_date));
    }

    #[test]
    fn quality_tier_dominates_ranking() {
        let rows = vec![
            row_with_signals(Some("Low"), Some(true), Some(true), "low"),
            row_with_signals(Some("High"), Some(false), Some(false), "high"),
            row_with_signals(Some("Medium"), Some(true), Some(true), "medium"),
        ];
        let ranked = rank(rows, 10);
        let order: Vec<&str> = ranked.iter().filter_map(|r| r.notes.as_deref()).collect();
        assert_eq!(order, ["high", "medium", "low"]);
    }

    #[test]
    fn indicators_break_ties_within_a_tier() {
        let rows = vec![
            row_with_signals(Some("High"), Some(false), Some(true), "iv-only"),
            row_with_signals(Some("High"), Some(true), Some(false), "trend-only"),
            row_with_signals(Some("High"), Some(true), Some(true), "both"),
        ];
        let ranked = rank(rows, 10);
        let order: Vec<&str> = ranked.iter().filter_map(|r| r.notes.as_deref()).collect();
        assert_eq!(order, ["both", "trend-only", "iv-only"]);
    }

    #[test]
    fn unknown_quality_sorts_below_low_and_missing_flags_count_as_false() {
        let rows = vec![
            row_with_signals(Some("Speculative"), Some(true), Some(true), "unknown"),
            row_with_signals(Some("Low"), None, None, "low"),
        ];
        let ranked = rank(rows, 10);
        let order: Vec<&str> = ranked.iter().filter_map(|r| r.notes.as_deref()).collect();
        assert_eq!(order, ["low", "unknown"]);
    }

    #[test]
    fn full_ties_keep_warehouse_order() {
        let rows = vec![
            row_with_signals(Some("High"), Some(true), Some(true), "first"),
            row_with_signals(Some("High"), Some(true), Some(true), "second"),
        ];
        let ranked = rank(rows, 10);
        let order: Vec<&str> = ranked.iter().filter_map(|r| r.notes.as_deref()).collect();
        assert_eq!(order, ["first", "second"]);
    }

    #[test]
    fn truncates_after_sorting() {
        let rows = vec![
            row_with_signals(Some("Low"), None, None, "low"),
            row_with_signals(Some("High"), None, None, "high"),
        ];
        let ranked = rank(rows, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].notes.as_deref(), Some("high"));
    }
}
