use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::filter::{FilterCatalog, FilterDefinition, FilterKind, FilterSelection};
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// Boundary checks for records and configuration.
///
/// Everything entering the system goes through here once, so the valuation
/// and screening services can assume finite, non-negative quantities and a
/// self-consistent filter catalog.
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    // ── Record loading ──────────────────────────────────────────────

    /// Deserialize portfolios from JSON and validate every one of them.
    pub fn parse_portfolios(&self, json: &str) -> Result<Vec<Portfolio>, CoreError> {
        let portfolios: Vec<Portfolio> = serde_json::from_str(json)?;
        for portfolio in &portfolios {
            self.validate_portfolio(portfolio)?;
        }
        Ok(portfolios)
    }

    /// Deserialize assets from JSON and validate every one of them.
    pub fn parse_assets(&self, json: &str) -> Result<Vec<Asset>, CoreError> {
        let assets: Vec<Asset> = serde_json::from_str(json)?;
        for asset in &assets {
            self.validate_asset(asset)?;
        }
        Ok(assets)
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Rules:
    /// - Holding ids are unique within the portfolio
    /// - Every holding is itself valid
    pub fn validate_portfolio(&self, portfolio: &Portfolio) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for holding in &portfolio.holdings {
            if !seen.insert(holding.id.as_str()) {
                return Err(self.reject(format!(
                    "Duplicate holding id '{}' in portfolio '{}'",
                    holding.id, portfolio.name
                )));
            }
            self.validate_holding(holding)?;
        }
        Ok(())
    }

    /// Rules:
    /// - Shares are finite and positive
    /// - Prices are finite and non-negative
    /// - Projected return and day change are finite
    /// - `investment_duration` is the reported figure and is not checked
    ///   against `purchase_date`
    /// - History samples are finite and in non-decreasing date order
    pub fn validate_holding(&self, holding: &Holding) -> Result<(), CoreError> {
        if !holding.shares.is_finite() || holding.shares <= 0.0 {
            return Err(self.reject(format!(
                "Holding {} must have a positive share count, got {}",
                holding.symbol, holding.shares
            )));
        }

        for (field, value) in [
            ("avg_price", holding.avg_price),
            ("current_price", holding.current_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(self.reject(format!(
                    "Holding {} has invalid {field}: {value}",
                    holding.symbol
                )));
            }
        }

        for (field, value) in [
            ("projected_return_percent", holding.projected_return_percent),
            ("day_change", holding.day_change),
            ("day_change_percent", holding.day_change_percent),
        ] {
            if !value.is_finite() {
                return Err(self.reject(format!(
                    "Holding {} has non-finite {field}",
                    holding.symbol
                )));
            }
        }

        let mut previous = None;
        for sample in &holding.performance_history {
            if !sample.value.is_finite() || !sample.gain.is_finite() {
                return Err(self.reject(format!(
                    "Holding {} has a non-finite history sample on {}",
                    holding.symbol, sample.date
                )));
            }
            if previous.is_some_and(|p| sample.date < p) {
                return Err(self.reject(format!(
                    "Holding {} history goes back in time at {}",
                    holding.symbol, sample.date
                )));
            }
            previous = Some(sample.date);
        }

        Ok(())
    }

    /// Check that the last history sample agrees with the current value
    /// within `tolerance`. A holding without history trivially reconciles.
    pub fn check_history_reconciles(
        &self,
        holding: &Holding,
        tolerance: f64,
    ) -> Result<(), CoreError> {
        let Some(last) = holding.performance_history.last() else {
            return Ok(());
        };
        let value = holding.shares * holding.current_price;
        if (last.value - value).abs() > tolerance {
            log::warn!(
                "History of {} ends at {} but current value is {}",
                holding.symbol,
                last.value,
                value
            );
            return Err(CoreError::ValidationError(format!(
                "Last history sample of {} ({}) does not match current value ({})",
                holding.symbol, last.value, value
            )));
        }
        Ok(())
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// Rules:
    /// - Symbol is non-empty
    /// - Price is non-negative
    /// - Every numeric field is finite
    pub fn validate_asset(&self, asset: &Asset) -> Result<(), CoreError> {
        if asset.symbol().trim().is_empty() {
            return Err(self.reject(format!(
                "{} asset '{}' has an empty symbol",
                asset.asset_class(),
                asset.label()
            )));
        }
        for (field, value) in asset.numeric_fields() {
            if !value.is_finite() {
                return Err(self.reject(format!(
                    "Asset {} has non-finite {field}",
                    asset.symbol()
                )));
            }
        }
        if asset.price() < 0.0 {
            return Err(self.reject(format!(
                "Asset {} has a negative price",
                asset.symbol()
            )));
        }
        Ok(())
    }

    // ── Filter configuration ────────────────────────────────────────

    /// Rules, per asset class:
    /// - Definition names are unique
    /// - Range bounds are finite and ordered, steps positive
    /// - Checkbox/radio definitions have unique, non-empty options
    /// - Preset ids are unique and every preset selection is valid for its
    ///   definition
    pub fn validate_catalog(&self, catalog: &FilterCatalog) -> Result<(), CoreError> {
        for (asset_class, filters) in catalog.classes() {
            let mut names = HashSet::new();
            for definition in &filters.definitions {
                if !names.insert(definition.name.as_str()) {
                    return Err(CoreError::InvalidFilterDefinition(format!(
                        "Duplicate filter '{}' for {asset_class}",
                        definition.name
                    )));
                }
                self.validate_definition(definition)?;
            }

            let mut preset_ids = HashSet::new();
            for preset in &filters.presets {
                if !preset_ids.insert(preset.id.as_str()) {
                    return Err(CoreError::InvalidFilterDefinition(format!(
                        "Duplicate preset '{}' for {asset_class}",
                        preset.id
                    )));
                }
                for (name, selection) in preset.filters.iter() {
                    let definition = catalog.definition(*asset_class, name)?;
                    self.validate_selection(definition, selection)?;
                }
                if let Some(sort) = preset.sort {
                    if sort.field_for(*asset_class).is_none() {
                        return Err(CoreError::UnknownSortKey(format!(
                            "{sort} for {asset_class} in preset '{}'",
                            preset.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Validate a single definition in isolation.
    pub fn validate_definition(&self, definition: &FilterDefinition) -> Result<(), CoreError> {
        let invalid = |msg: String| {
            CoreError::InvalidFilterDefinition(format!("{}: {msg}", definition.name))
        };

        match definition.kind {
            FilterKind::Range => {
                if let (Some(min), Some(max)) = (definition.min, definition.max) {
                    if !min.is_finite() || !max.is_finite() || min > max {
                        return Err(invalid(format!("bad bounds [{min}, {max}]")));
                    }
                }
                if let Some(step) = definition.step {
                    if !step.is_finite() || step <= 0.0 {
                        return Err(invalid(format!("step must be positive, got {step}")));
                    }
                }
            }
            FilterKind::Checkbox | FilterKind::Radio => {
                if definition.options.is_empty() {
                    return Err(invalid(format!("{} filter has no options", definition.kind)));
                }
                let mut values = HashSet::new();
                for option in &definition.options {
                    if !values.insert(option.value.as_str()) {
                        return Err(invalid(format!("duplicate option '{}'", option.value)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Check that a selection fits its definition: same kind, ordered finite
    /// range, and only configured option values.
    pub fn validate_selection(
        &self,
        definition: &FilterDefinition,
        selection: &FilterSelection,
    ) -> Result<(), CoreError> {
        if selection.kind() != definition.kind {
            return Err(CoreError::FilterKindMismatch {
                name: definition.name.clone(),
                expected: definition.kind.to_string(),
                found: selection.kind().to_string(),
            });
        }

        let known = |value: &str| definition.options.iter().any(|o| o.value == value);
        match selection {
            FilterSelection::Range { min, max } => {
                if min.is_nan() || max.is_nan() || min > max {
                    return Err(CoreError::ValidationError(format!(
                        "Filter '{}' has an empty range [{min}, {max}]",
                        definition.name
                    )));
                }
            }
            FilterSelection::Checkbox(values) => {
                if let Some(unknown) = values.iter().find(|v| !known(v.as_str())) {
                    return Err(CoreError::ValidationError(format!(
                        "Filter '{}' has no option '{unknown}'",
                        definition.name
                    )));
                }
            }
            FilterSelection::Radio(value) => {
                if !known(value.as_str()) {
                    return Err(CoreError::ValidationError(format!(
                        "Filter '{}' has no option '{value}'",
                        definition.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn reject(&self, message: String) -> CoreError {
        log::warn!("Rejected record: {message}");
        CoreError::ValidationError(message)
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
