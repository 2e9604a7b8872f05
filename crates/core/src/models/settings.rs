use serde::{Deserialize, Serialize};

/// Default projection horizon, in months.
pub const DEFAULT_PROJECTION_HORIZON_MONTHS: u32 = 24;

/// How the aggregate performance series treats a date on which a holding
/// has no sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesGapPolicy {
    /// The holding contributes nothing on that date. Holdings bought later
    /// are therefore absent from earlier points, which under-counts history
    /// when sampling calendars differ.
    #[default]
    ZeroFill,
    /// The holding contributes its most recent earlier sample, or nothing
    /// before its first sample.
    CarryForward,
}

/// Call-site knobs for the valuation engine. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Horizon used for projected values in summaries
    pub projection_horizon_months: u32,

    /// Gap handling for the account performance series
    #[serde(default)]
    pub series_gap_policy: SeriesGapPolicy,

    /// Absolute tolerance when reconciling the last history sample with the
    /// current value
    pub reconciliation_tolerance: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            projection_horizon_months: DEFAULT_PROJECTION_HORIZON_MONTHS,
            series_gap_policy: SeriesGapPolicy::ZeroFill,
            reconciliation_tolerance: 0.01,
        }
    }
}
