use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::months_between;

/// One sample of a holding's value history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub date: NaiveDate,
    /// Position value on `date`
    pub value: f64,
    /// Unrealized gain on `date`
    pub gain: f64,
}

/// A position within a portfolio.
///
/// Only the quantitative fields are the source of truth. Value, gain and
/// allocation are always derived by the valuation service and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique within its portfolio
    pub id: String,

    /// Ticker symbol (e.g., "AAPL")
    pub symbol: String,

    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,

    /// Market or exchange the position trades on (e.g., "NASDAQ")
    pub market: String,

    /// Number of shares held (> 0)
    pub shares: f64,

    /// Cost basis per share (>= 0)
    pub avg_price: f64,

    /// Latest known price per share (>= 0)
    pub current_price: f64,

    /// Price change since the previous close, passed through untouched
    #[serde(default)]
    pub day_change: f64,

    /// Percentage price change since the previous close, passed through untouched
    #[serde(default)]
    pub day_change_percent: f64,

    pub purchase_date: NaiveDate,

    /// Whole months held, as reported by the source record. Stored as given
    /// and never reconciled with `purchase_date`; use `elapsed_months` for
    /// the figure derived from the calendar.
    #[serde(default)]
    pub investment_duration: u32,

    /// Target return (percent) at the projection horizon
    #[serde(default)]
    pub projected_return_percent: f64,

    /// Date-ascending, append-only value history
    #[serde(default)]
    pub performance_history: Vec<PerformanceSample>,
}

impl Holding {
    /// Create a holding with a fresh id and an empty history.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        market: impl Into<String>,
        shares: f64,
        avg_price: f64,
        current_price: f64,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            market: market.into(),
            shares,
            avg_price,
            current_price,
            day_change: 0.0,
            day_change_percent: 0.0,
            purchase_date,
            investment_duration: 0,
            projected_return_percent: 0.0,
            performance_history: Vec::new(),
        }
    }

    /// Builder-style setter for the projected return target.
    pub fn with_projected_return(mut self, percent: f64) -> Self {
        self.projected_return_percent = percent;
        self
    }

    /// Builder-style setter for the elapsed duration in months.
    pub fn with_duration(mut self, months: u32) -> Self {
        self.investment_duration = months;
        self
    }

    /// Append a history sample. Samples must arrive in date order.
    pub fn push_sample(&mut self, date: NaiveDate, value: f64, gain: f64) {
        self.performance_history
            .push(PerformanceSample { date, value, gain });
    }

    /// Total amount paid for the position: `shares × avg_price`.
    pub fn cost_basis(&self) -> f64 {
        self.shares * self.avg_price
    }

    /// Whole months held as of `as_of`, computed from `purchase_date`.
    pub fn elapsed_months(&self, as_of: NaiveDate) -> u32 {
        months_between(self.purchase_date, as_of)
    }
}

/// A holding together with its derived valuation figures.
///
/// `allocation_pct` is only meaningful inside a portfolio or account rollup;
/// a standalone valuation leaves it at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    pub holding: Holding,

    /// `shares × current_price`
    pub value: f64,

    /// `shares × avg_price`
    pub cost_basis: f64,

    /// `value − cost_basis`
    pub gain: f64,

    /// `gain / cost_basis × 100`, or 0 when the cost basis is 0
    pub gain_percent: f64,

    pub day_change: f64,
    pub day_change_percent: f64,

    /// Share of the enclosing portfolio/account value, in percent
    pub allocation_pct: f64,
}
