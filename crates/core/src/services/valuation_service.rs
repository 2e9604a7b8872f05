use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::analytics::{
    AccountHolding, AccountSummary, MarketAllocation, Performer, PortfolioSummary, Projection,
    SeriesPoint,
};
use crate::models::holding::{EnrichedHolding, Holding, PerformanceSample};
use crate::models::portfolio::Portfolio;
use crate::models::settings::{DashboardSettings, SeriesGapPolicy};
use crate::utils::{mean_or_zero, ratio_or_zero};

/// Derives the numbers shown for holdings, portfolios and whole accounts.
///
/// Pure computation over the records it is handed: no I/O, no cached state.
/// Every figure is recomputed from `shares`, `avg_price` and `current_price`
/// on each call and returned unrounded; rounding is for the caller.
pub struct ValuationService {
    settings: DashboardSettings,
}

/// Account-or-portfolio totals shared by both summary shapes.
struct Rollup {
    total_invested: f64,
    total_current_value: f64,
    total_gain: f64,
    total_gain_percent: f64,
    total_day_change: f64,
    average_duration_months: f64,
    average_projected_return: f64,
    projected_value: f64,
    best: Option<usize>,
    worst: Option<usize>,
}

impl ValuationService {
    pub fn new() -> Self {
        Self::with_settings(DashboardSettings::default())
    }

    pub fn with_settings(settings: DashboardSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Value a single holding.
    ///
    /// Only `shares`, `avg_price` and `current_price` are read, so valuing
    /// the `holding` of an already enriched result gives the same figures.
    /// A zero cost basis reports a gain percent of 0.
    pub fn value_holding(&self, holding: &Holding) -> EnrichedHolding {
        let value = holding.shares * holding.current_price;
        let cost_basis = holding.cost_basis();
        let gain = value - cost_basis;

        EnrichedHolding {
            holding: holding.clone(),
            value,
            cost_basis,
            gain,
            gain_percent: ratio_or_zero(gain, cost_basis) * 100.0,
            day_change: holding.day_change,
            day_change_percent: holding.day_change_percent,
            allocation_pct: 0.0, // only meaningful inside a rollup
        }
    }

    /// Roll up one portfolio.
    ///
    /// Holdings keep their input order. An empty portfolio yields zeros and
    /// no best/worst performer.
    pub fn aggregate_portfolio(&self, portfolio: &Portfolio) -> PortfolioSummary {
        let mut holdings: Vec<EnrichedHolding> = portfolio
            .holdings
            .iter()
            .map(|h| self.value_holding(h))
            .collect();

        let rollup = self.rollup(&holdings);
        Self::fill_allocation(&mut holdings, rollup.total_current_value);

        log::debug!(
            "Portfolio '{}': {} holdings, value {}, invested {}",
            portfolio.name,
            holdings.len(),
            rollup.total_current_value,
            rollup.total_invested
        );

        let best_performer = rollup.best.map(|i| Self::performer(&holdings[i], None));
        let worst_performer = rollup.worst.map(|i| Self::performer(&holdings[i], None));

        PortfolioSummary {
            portfolio_id: portfolio.id.clone(),
            portfolio_name: portfolio.name.clone(),
            holding_count: holdings.len(),
            total_invested: rollup.total_invested,
            total_current_value: rollup.total_current_value,
            total_gain: rollup.total_gain,
            total_gain_percent: rollup.total_gain_percent,
            total_day_change: rollup.total_day_change,
            average_duration_months: rollup.average_duration_months,
            average_projected_return: rollup.average_projected_return,
            projected_value: rollup.projected_value,
            best_performer,
            worst_performer,
            holdings,
        }
    }

    /// Roll up every portfolio of an account.
    ///
    /// Holdings are flattened across portfolios (tagged with their origin)
    /// and go through the same math as a single portfolio. Allocation is
    /// relative to the whole account.
    pub fn aggregate_account(&self, portfolios: &[Portfolio]) -> AccountSummary {
        let summaries: Vec<PortfolioSummary> = portfolios
            .iter()
            .map(|p| self.aggregate_portfolio(p))
            .collect();

        let mut holdings: Vec<AccountHolding> = summaries
            .iter()
            .flat_map(|summary| {
                summary.holdings.iter().map(|h| AccountHolding {
                    portfolio_id: summary.portfolio_id.clone(),
                    portfolio_name: summary.portfolio_name.clone(),
                    holding: h.clone(),
                })
            })
            .collect();

        let enriched: Vec<EnrichedHolding> = holdings.iter().map(|h| h.holding.clone()).collect();
        let rollup = self.rollup(&enriched);
        for tagged in &mut holdings {
            tagged.holding.allocation_pct =
                ratio_or_zero(tagged.holding.value, rollup.total_current_value) * 100.0;
        }

        let tagged_performer = |i: usize| {
            let tagged = &holdings[i];
            Self::performer(&tagged.holding, Some(tagged.portfolio_id.clone()))
        };
        let best_performer = rollup.best.map(tagged_performer);
        let worst_performer = rollup.worst.map(tagged_performer);

        let market_breakdown = Self::market_breakdown(&enriched, rollup.total_current_value);
        let performance_series = self.performance_series(
            portfolios.iter().flat_map(|p| p.holdings.iter()),
            self.settings.series_gap_policy,
        );

        log::debug!(
            "Account: {} portfolios, {} holdings, {} series points",
            summaries.len(),
            holdings.len(),
            performance_series.len()
        );

        AccountSummary {
            portfolio_count: summaries.len(),
            holding_count: holdings.len(),
            total_invested: rollup.total_invested,
            total_current_value: rollup.total_current_value,
            total_gain: rollup.total_gain,
            total_gain_percent: rollup.total_gain_percent,
            total_day_change: rollup.total_day_change,
            average_duration_months: rollup.average_duration_months,
            average_projected_return: rollup.average_projected_return,
            projected_value: rollup.projected_value,
            best_performer,
            worst_performer,
            holdings,
            portfolios: summaries,
            market_breakdown,
            performance_series,
        }
    }

    /// Projected value of a holding once its target return is captured.
    ///
    /// `value × (1 + (projected_return − gain_percent) / 100)`: a flat
    /// adjustment by the return still outstanding, not compounded. A holding
    /// already past its target projects below its current value.
    pub fn project_future_value(&self, holding: &Holding, horizon_months: u32) -> f64 {
        self.projection(holding, horizon_months).projected_value
    }

    /// Like [`project_future_value`](Self::project_future_value), with the
    /// horizon bookkeeping. The value is still computed when no months
    /// remain.
    pub fn projection(&self, holding: &Holding, horizon_months: u32) -> Projection {
        Self::project(&self.value_holding(holding), horizon_months)
    }

    fn project(enriched: &EnrichedHolding, horizon_months: u32) -> Projection {
        let outstanding = enriched.holding.projected_return_percent - enriched.gain_percent;
        let months_remaining = horizon_months.saturating_sub(enriched.holding.investment_duration);

        Projection {
            projected_value: enriched.value * (1.0 + outstanding / 100.0),
            horizon_months,
            months_remaining,
            target_reached: months_remaining == 0,
        }
    }

    /// Date-aligned sum of the given holdings' performance histories.
    ///
    /// One point per distinct sample date, ascending. With
    /// [`SeriesGapPolicy::ZeroFill`] a holding with no sample on a date adds
    /// nothing to it; nothing is interpolated. When a holding has several
    /// samples on one date, the last one counts.
    pub fn performance_series<'a>(
        &self,
        holdings: impl IntoIterator<Item = &'a Holding>,
        policy: SeriesGapPolicy,
    ) -> Vec<SeriesPoint> {
        let histories: Vec<Vec<&PerformanceSample>> = holdings
            .into_iter()
            .map(|h| Self::last_sample_per_date(&h.performance_history))
            .collect();

        let dates: BTreeSet<NaiveDate> = histories
            .iter()
            .flat_map(|history| history.iter().map(|s| s.date))
            .collect();

        let mut totals: BTreeMap<NaiveDate, (f64, f64)> =
            dates.iter().map(|d| (*d, (0.0, 0.0))).collect();

        for history in &histories {
            match policy {
                SeriesGapPolicy::ZeroFill => {
                    for sample in history {
                        if let Some(total) = totals.get_mut(&sample.date) {
                            total.0 += sample.value;
                            total.1 += sample.gain;
                        }
                    }
                }
                SeriesGapPolicy::CarryForward => {
                    let mut next = 0;
                    let mut latest: Option<&PerformanceSample> = None;
                    for (date, total) in totals.iter_mut() {
                        while next < history.len() && history[next].date <= *date {
                            latest = Some(history[next]);
                            next += 1;
                        }
                        if let Some(sample) = latest {
                            total.0 += sample.value;
                            total.1 += sample.gain;
                        }
                    }
                }
            }
        }

        totals
            .into_iter()
            .map(|(date, (value, gain))| SeriesPoint { date, value, gain })
            .collect()
    }

    // ── Internals ───────────────────────────────────────────────────

    fn rollup(&self, holdings: &[EnrichedHolding]) -> Rollup {
        let mut total_invested = 0.0;
        let mut total_current_value = 0.0;
        let mut total_day_change = 0.0;
        let mut projected_value = 0.0;
        let mut best: Option<usize> = None;
        let mut worst: Option<usize> = None;

        for (i, h) in holdings.iter().enumerate() {
            total_invested += h.cost_basis;
            total_current_value += h.value;
            total_day_change += h.holding.shares * h.day_change;
            projected_value +=
                Self::project(h, self.settings.projection_horizon_months).projected_value;

            // Strict comparisons: the first holding wins ties.
            if best.map_or(true, |b| h.gain_percent > holdings[b].gain_percent) {
                best = Some(i);
            }
            if worst.map_or(true, |w| h.gain_percent < holdings[w].gain_percent) {
                worst = Some(i);
            }
        }

        let total_gain = total_current_value - total_invested;

        Rollup {
            total_invested,
            total_current_value,
            total_gain,
            total_gain_percent: ratio_or_zero(total_gain, total_invested) * 100.0,
            total_day_change,
            average_duration_months: mean_or_zero(
                holdings.iter().map(|h| f64::from(h.holding.investment_duration)),
            ),
            average_projected_return: mean_or_zero(
                holdings.iter().map(|h| h.holding.projected_return_percent),
            ),
            projected_value,
            best,
            worst,
        }
    }

    fn fill_allocation(holdings: &mut [EnrichedHolding], total_value: f64) {
        for holding in holdings {
            holding.allocation_pct = ratio_or_zero(holding.value, total_value) * 100.0;
        }
    }

    fn performer(holding: &EnrichedHolding, portfolio_id: Option<String>) -> Performer {
        Performer {
            holding_id: holding.holding.id.clone(),
            symbol: holding.holding.symbol.clone(),
            name: holding.holding.name.clone(),
            gain_percent: holding.gain_percent,
            portfolio_id,
        }
    }

    fn market_breakdown(holdings: &[EnrichedHolding], total_value: f64) -> Vec<MarketAllocation> {
        let mut by_market: BTreeMap<&str, f64> = BTreeMap::new();
        for h in holdings {
            *by_market.entry(h.holding.market.as_str()).or_insert(0.0) += h.value;
        }

        let mut breakdown: Vec<MarketAllocation> = by_market
            .into_iter()
            .map(|(market, value)| MarketAllocation {
                market: market.to_string(),
                value,
                allocation_pct: ratio_or_zero(value, total_value) * 100.0,
            })
            .collect();

        // Largest first; the stable sort keeps ties alphabetical
        breakdown.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        breakdown
    }

    fn last_sample_per_date(history: &[PerformanceSample]) -> Vec<&PerformanceSample> {
        let mut samples: Vec<&PerformanceSample> = Vec::with_capacity(history.len());
        for sample in history {
            if let Some(last) = samples.last_mut() {
                if last.date == sample.date {
                    *last = sample;
                    continue;
                }
            }
            samples.push(sample);
        }
        samples
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
