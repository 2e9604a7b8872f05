use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::asset::AssetClass;
use super::filter::{FilterSelection, FilterState};
use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The fixed sort vocabulary offered by the screener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Largest daily change first
    Gainers,
    /// Smallest daily change first
    Losers,
    /// Highest traded volume first
    Volume,
    /// Alphabetical by name
    Name,
    PriceHigh,
    PriceLow,
    /// Highest yield first (dividend yield, or yield to maturity for bonds)
    YieldDesc,
    /// Cheapest expense ratio first
    ExpenseAsc,
    /// Largest market cap (AUM for ETFs) first
    MarketCapDesc,
    /// Highest one-year return first
    ReturnDesc,
    /// Highest star rating first
    RatingDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 11] = [
        SortKey::Gainers,
        SortKey::Losers,
        SortKey::Volume,
        SortKey::Name,
        SortKey::PriceHigh,
        SortKey::PriceLow,
        SortKey::YieldDesc,
        SortKey::ExpenseAsc,
        SortKey::MarketCapDesc,
        SortKey::ReturnDesc,
        SortKey::RatingDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Gainers => "gainers",
            SortKey::Losers => "losers",
            SortKey::Volume => "volume",
            SortKey::Name => "name",
            SortKey::PriceHigh => "price_high",
            SortKey::PriceLow => "price_low",
            SortKey::YieldDesc => "yield_desc",
            SortKey::ExpenseAsc => "expense_asc",
            SortKey::MarketCapDesc => "market_cap_desc",
            SortKey::ReturnDesc => "return_desc",
            SortKey::RatingDesc => "rating_desc",
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            SortKey::Losers | SortKey::Name | SortKey::PriceLow | SortKey::ExpenseAsc => {
                SortDirection::Ascending
            }
            _ => SortDirection::Descending,
        }
    }

    /// The asset field this key orders by for a given class, or `None` when
    /// the class has no such dimension.
    pub fn field_for(&self, asset_class: AssetClass) -> Option<&'static str> {
        use AssetClass::*;

        match (self, asset_class) {
            (SortKey::Gainers | SortKey::Losers, _) => Some("change_percent"),
            (SortKey::Name, _) => Some("name"),
            (SortKey::PriceHigh | SortKey::PriceLow, _) => Some("price"),
            (SortKey::Volume, Stock | Etf | Commodity) => Some("volume"),
            (SortKey::YieldDesc, Stock | Etf) => Some("dividend_yield"),
            (SortKey::YieldDesc, Bond) => Some("yield_to_maturity"),
            (SortKey::ExpenseAsc, Etf | MutualFund) => Some("expense_ratio"),
            (SortKey::MarketCapDesc, Stock) => Some("market_cap"),
            (SortKey::MarketCapDesc, Etf) => Some("aum"),
            (SortKey::ReturnDesc, MutualFund) => Some("one_year_return"),
            (SortKey::RatingDesc, MutualFund) => Some("morningstar_rating"),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| CoreError::UnknownSortKey(s.to_string()))
    }
}

/// Everything the screener needs besides the assets themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRequest {
    pub asset_class: AssetClass,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub sort: Option<SortKey>,
}

impl ScreenRequest {
    pub fn new(asset_class: AssetClass) -> Self {
        Self {
            asset_class,
            query: String::new(),
            filters: FilterState::new(),
            sort: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, selection: FilterSelection) -> Self {
        self.filters.set(name, selection);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }
}
