use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contract side filter for warehouse queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

/// One pre-computed signal row from the warehouse. Keyed upstream by
/// `(run_date, ticker, option_type, expiration_date)`; read-only here.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SignalRow {
    pub run_date: NaiveDate,
    pub ticker: String,
    pub option_type: String,
    pub expiration_date: NaiveDate,
    pub days_to_expiration: i32,
    pub setup_quality_signal: Option<String>,
    pub is_trend_aligned: Option<bool>,
    pub is_iv_favorable: Option<bool>,
    pub strike_price: Option<f64>,
    pub underlying_price: Option<f64>,
    pub delta: Option<f64>,
    pub implied_volatility: Option<f64>,
    pub iv_rank: Option<f64>,
    pub signal_score: Option<f64>,
    pub notes: Option<String>,
}

impl SignalRow {
    /// Ordinal value of the qualitative setup signal. Unknown or missing
    /// labels rank below `Low`.
    pub fn quality_tier(&self) -> u8 {
        match self.setup_quality_signal.as_deref() {
            Some("High") => 3,
            Some("Medium") => 2,
            Some("Low") => 1,
            _ => 0,
        }
    }
}
