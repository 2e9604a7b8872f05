use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;
use crate::utils::parse_magnitude;

/// The class of a market asset. Each class has its own record shape and its
/// own filter definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stock,
    Bond,
    Etf,
    MutualFund,
    Commodity,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stock,
        AssetClass::Bond,
        AssetClass::Etf,
        AssetClass::MutualFund,
        AssetClass::Commodity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stock => "stock",
            AssetClass::Bond => "bond",
            AssetClass::Etf => "etf",
            AssetClass::MutualFund => "mutual_fund",
            AssetClass::Commodity => "commodity",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownAssetClass(s.to_string()))
    }
}

/// A borrowed view of one asset field, as seen by filters and sorts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    Date(NaiveDate),
}

impl FieldValue<'_> {
    /// Numeric reading of the field. Human-readable magnitudes such as
    /// `"89M"` are parsed; dates and non-numeric text have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_magnitude(s),
            FieldValue::Date(_) => None,
        }
    }

    /// Whether the field equals a configured option value.
    pub fn matches_option(&self, option: &str) -> bool {
        match self {
            FieldValue::Text(s) => *s == option,
            FieldValue::Number(n) => option.trim().parse::<f64>().is_ok_and(|o| o == *n),
            FieldValue::Date(d) => NaiveDate::from_str(option.trim()).is_ok_and(|o| o == *d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    /// Human-readable, e.g. "89M"
    #[serde(default)]
    pub volume: String,
    /// Human-readable, e.g. "2.9T"
    #[serde(default)]
    pub market_cap: String,
    pub sector: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    pub symbol: String,
    pub name: String,
    pub issuer: String,
    /// e.g. "Treasury", "Corporate", "Municipal"
    #[serde(default)]
    pub bond_type: String,
    pub price: f64,
    #[serde(default)]
    pub change_percent: f64,
    pub coupon_rate: f64,
    pub yield_to_maturity: f64,
    pub credit_rating: String,
    pub maturity_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Etf {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub volume: String,
    pub category: String,
    pub expense_ratio: f64,
    /// Assets under management, human-readable
    #[serde(default)]
    pub aum: String,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualFund {
    pub symbol: String,
    pub name: String,
    /// Net asset value per share
    pub nav: f64,
    #[serde(default)]
    pub change_percent: f64,
    pub category: String,
    #[serde(default)]
    pub fund_family: String,
    pub expense_ratio: f64,
    #[serde(default)]
    pub min_investment: f64,
    #[serde(default)]
    pub one_year_return: Option<f64>,
    /// 1–5 stars
    #[serde(default)]
    pub morningstar_rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    /// e.g. "Metals", "Energy", "Agriculture"
    pub category: String,
    /// Quote unit, e.g. "oz", "bbl"
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub volume: String,
}

/// A market asset, tagged by class.
///
/// Filters and sorts never look at the variant directly: they go through
/// [`Asset::field`], which is the only place field names are mapped to data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "asset_class", rename_all = "snake_case")]
pub enum Asset {
    Stock(Stock),
    Bond(Bond),
    Etf(Etf),
    MutualFund(MutualFund),
    Commodity(Commodity),
}

impl Asset {
    pub fn asset_class(&self) -> AssetClass {
        match self {
            Asset::Stock(_) => AssetClass::Stock,
            Asset::Bond(_) => AssetClass::Bond,
            Asset::Etf(_) => AssetClass::Etf,
            Asset::MutualFund(_) => AssetClass::MutualFund,
            Asset::Commodity(_) => AssetClass::Commodity,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Asset::Stock(a) => &a.symbol,
            Asset::Bond(a) => &a.symbol,
            Asset::Etf(a) => &a.symbol,
            Asset::MutualFund(a) => &a.symbol,
            Asset::Commodity(a) => &a.symbol,
        }
    }

    /// Display label of the asset.
    pub fn label(&self) -> &str {
        match self {
            Asset::Stock(a) => &a.name,
            Asset::Bond(a) => &a.name,
            Asset::Etf(a) => &a.name,
            Asset::MutualFund(a) => &a.name,
            Asset::Commodity(a) => &a.name,
        }
    }

    /// Quoted price per unit (NAV for mutual funds).
    pub fn price(&self) -> f64 {
        match self {
            Asset::Stock(a) => a.price,
            Asset::Bond(a) => a.price,
            Asset::Etf(a) => a.price,
            Asset::MutualFund(a) => a.nav,
            Asset::Commodity(a) => a.price,
        }
    }

    pub fn change_percent(&self) -> f64 {
        match self {
            Asset::Stock(a) => a.change_percent,
            Asset::Bond(a) => a.change_percent,
            Asset::Etf(a) => a.change_percent,
            Asset::MutualFund(a) => a.change_percent,
            Asset::Commodity(a) => a.change_percent,
        }
    }

    /// Fields the free-text query searches, in order.
    pub fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.symbol(), self.label()];
        if let Asset::Bond(bond) = self {
            fields.push(&bond.issuer);
        }
        fields
    }

    /// Look up a field by name. `None` when this class has no such field or
    /// the optional value is absent.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        use FieldValue::{Date, Number, Text};

        match name {
            "symbol" => return Some(Text(self.symbol())),
            "name" => return Some(Text(self.label())),
            "price" => return Some(Number(self.price())),
            "change_percent" => return Some(Number(self.change_percent())),
            "asset_class" => return Some(Text(self.asset_class().as_str())),
            _ => {}
        }

        match self {
            Asset::Stock(s) => match name {
                "change" => Some(Number(s.change)),
                "volume" => Some(Text(&s.volume)),
                "market_cap" => Some(Text(&s.market_cap)),
                "sector" => Some(Text(&s.sector)),
                "exchange" => Some(Text(&s.exchange)),
                "pe_ratio" => s.pe_ratio.map(Number),
                "dividend_yield" => s.dividend_yield.map(Number),
                _ => None,
            },
            Asset::Bond(b) => match name {
                "issuer" => Some(Text(&b.issuer)),
                "bond_type" => Some(Text(&b.bond_type)),
                "coupon_rate" => Some(Number(b.coupon_rate)),
                "yield_to_maturity" => Some(Number(b.yield_to_maturity)),
                "credit_rating" => Some(Text(&b.credit_rating)),
                "maturity_date" => Some(Date(b.maturity_date)),
                "maturity_year" => Some(Number(f64::from(b.maturity_date.year()))),
                _ => None,
            },
            Asset::Etf(e) => match name {
                "volume" => Some(Text(&e.volume)),
                "category" => Some(Text(&e.category)),
                "expense_ratio" => Some(Number(e.expense_ratio)),
                "aum" => Some(Text(&e.aum)),
                "dividend_yield" => e.dividend_yield.map(Number),
                _ => None,
            },
            Asset::MutualFund(m) => match name {
                "nav" => Some(Number(m.nav)),
                "category" => Some(Text(&m.category)),
                "fund_family" => Some(Text(&m.fund_family)),
                "expense_ratio" => Some(Number(m.expense_ratio)),
                "min_investment" => Some(Number(m.min_investment)),
                "one_year_return" => m.one_year_return.map(Number),
                "morningstar_rating" => m.morningstar_rating.map(|r| Number(f64::from(r))),
                _ => None,
            },
            Asset::Commodity(c) => match name {
                "change" => Some(Number(c.change)),
                "category" => Some(Text(&c.category)),
                "unit" => Some(Text(&c.unit)),
                "volume" => Some(Text(&c.volume)),
                _ => None,
            },
        }
    }

    /// Every numeric value carried by the record, with its field name.
    /// Used by boundary validation.
    pub(crate) fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![("price", self.price()), ("change_percent", self.change_percent())];
        match self {
            Asset::Stock(s) => {
                out.push(("change", s.change));
                out.extend(s.pe_ratio.map(|v| ("pe_ratio", v)));
                out.extend(s.dividend_yield.map(|v| ("dividend_yield", v)));
            }
            Asset::Bond(b) => {
                out.push(("coupon_rate", b.coupon_rate));
                out.push(("yield_to_maturity", b.yield_to_maturity));
            }
            Asset::Etf(e) => {
                out.push(("expense_ratio", e.expense_ratio));
                out.extend(e.dividend_yield.map(|v| ("dividend_yield", v)));
            }
            Asset::MutualFund(m) => {
                out.push(("expense_ratio", m.expense_ratio));
                out.push(("min_investment", m.min_investment));
                out.extend(m.one_year_return.map(|v| ("one_year_return", v)));
            }
            Asset::Commodity(c) => out.push(("change", c.change)),
        }
        out
    }
}
