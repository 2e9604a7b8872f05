use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::holding::EnrichedHolding;

/// Rollup of a single portfolio.
///
/// An empty portfolio yields zeros everywhere and `None` for the performers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub portfolio_id: String,
    pub portfolio_name: String,

    /// Number of holdings in the portfolio
    pub holding_count: usize,

    /// Σ shares × avg_price
    pub total_invested: f64,

    /// Σ shares × current_price
    pub total_current_value: f64,

    /// total_current_value − total_invested
    pub total_gain: f64,

    /// total_gain / total_invested × 100, or 0 with nothing invested
    pub total_gain_percent: f64,

    /// Σ shares × day_change
    pub total_day_change: f64,

    /// Mean `investment_duration` across holdings, in months
    pub average_duration_months: f64,

    /// Mean `projected_return_percent` across holdings
    pub average_projected_return: f64,

    /// Σ projected future value at the configured horizon
    pub projected_value: f64,

    pub best_performer: Option<Performer>,
    pub worst_performer: Option<Performer>,

    /// Per-holding breakdown, allocation filled in
    pub holdings: Vec<EnrichedHolding>,
}

/// Rollup across every portfolio of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Number of portfolios rolled up
    pub portfolio_count: usize,

    /// Number of holdings across all portfolios
    pub holding_count: usize,

    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_gain: f64,
    pub total_gain_percent: f64,
    pub total_day_change: f64,
    pub average_duration_months: f64,
    pub average_projected_return: f64,
    pub projected_value: f64,

    pub best_performer: Option<Performer>,
    pub worst_performer: Option<Performer>,

    /// Every holding, tagged with the portfolio it came from.
    /// Allocation is relative to the whole account.
    pub holdings: Vec<AccountHolding>,

    /// Per-portfolio summaries, in input order
    pub portfolios: Vec<PortfolioSummary>,

    /// Value grouped by market, largest first
    pub market_breakdown: Vec<MarketAllocation>,

    /// Date-aligned aggregate of every holding's performance history
    pub performance_series: Vec<SeriesPoint>,
}

/// A holding flattened out of its portfolio for account-level views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountHolding {
    pub portfolio_id: String,
    pub portfolio_name: String,
    pub holding: EnrichedHolding,
}

/// The best or worst holding by gain percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub holding_id: String,
    pub symbol: String,
    pub name: String,
    pub gain_percent: f64,

    /// Set for account-level performers only
    pub portfolio_id: Option<String>,
}

/// Summed value of all holdings sharing a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAllocation {
    pub market: String,
    pub value: f64,
    pub allocation_pct: f64,
}

/// One point of the aggregate performance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub gain: f64,
}

/// Linear projection of a holding towards its target return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// current value × (1 + (projected_return − gain_percent) / 100)
    pub projected_value: f64,

    /// Horizon the projection was made against, in months
    pub horizon_months: u32,

    /// max(0, horizon − investment_duration)
    pub months_remaining: u32,

    /// True once the horizon has elapsed; the value is then the
    /// "if the target is eventually reached" figure, not today's value.
    pub target_reached: bool,
}
