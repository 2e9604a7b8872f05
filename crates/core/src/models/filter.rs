use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::asset::AssetClass;
use super::screen::SortKey;
use crate::errors::CoreError;
use crate::services::validation_service::ValidationService;

/// Filter tables shipped with the crate, covering every asset class.
const BUILTIN_CATALOG: &str = include_str!("../../config/filters.json");

/// How a filter constrains its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Numeric value within an inclusive `[min, max]`
    Range,
    /// Value is one of a selected set
    Checkbox,
    /// Value equals a single selected option
    Radio,
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Range => write!(f, "range"),
            FilterKind::Checkbox => write!(f, "checkbox"),
            FilterKind::Radio => write!(f, "radio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

/// One screenable dimension of an asset class. Configuration data: it is
/// never derived from the asset collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Key used in a `FilterState`
    pub name: String,

    /// Display label; falls back to `name`
    #[serde(default)]
    pub label: Option<String>,

    pub kind: FilterKind,

    /// Asset field this filter reads; falls back to `name`
    #[serde(default)]
    pub field: Option<String>,

    /// Choices for checkbox/radio filters
    #[serde(default)]
    pub options: Vec<FilterOption>,

    /// Slider bounds for range filters
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
}

impl FilterDefinition {
    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A user's selection for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSelection {
    Range { min: f64, max: f64 },
    /// An empty set places no constraint
    Checkbox(Vec<String>),
    Radio(String),
}

impl FilterSelection {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSelection::Range { .. } => FilterKind::Range,
            FilterSelection::Checkbox(_) => FilterKind::Checkbox,
            FilterSelection::Radio(_) => FilterKind::Radio,
        }
    }
}

/// Current selections keyed by filter name. A missing key means the filter
/// is inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, FilterSelection>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, selection: FilterSelection) -> Self {
        self.set(name, selection);
        self
    }

    pub fn range(self, name: impl Into<String>, min: f64, max: f64) -> Self {
        self.with(name, FilterSelection::Range { min, max })
    }

    pub fn checkbox<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.with(name, FilterSelection::Checkbox(values))
    }

    pub fn radio(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, FilterSelection::Radio(value.into()))
    }

    pub fn set(&mut self, name: impl Into<String>, selection: FilterSelection) {
        self.0.insert(name.into(), selection);
    }

    pub fn clear(&mut self, name: &str) -> Option<FilterSelection> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FilterSelection> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterSelection)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A canned filter state and sort offered as a one-click shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetScreen {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub sort: Option<SortKey>,
}

/// Filter definitions and presets for one asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassFilters {
    #[serde(default)]
    pub definitions: Vec<FilterDefinition>,
    #[serde(default)]
    pub presets: Vec<PresetScreen>,
}

/// Every asset class's filter table, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCatalog {
    classes: BTreeMap<AssetClass, ClassFilters>,
}

impl FilterCatalog {
    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let catalog: FilterCatalog = serde_json::from_str(json)?;
        ValidationService::new().validate_catalog(&catalog)?;
        log::debug!(
            "Loaded filter catalog for {} asset classes",
            catalog.classes.len()
        );
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Install or replace the table for one class. Not validated; call
    /// `ValidationService::validate_catalog` before screening with it.
    pub fn insert(&mut self, asset_class: AssetClass, filters: ClassFilters) {
        self.classes.insert(asset_class, filters);
    }

    pub fn classes(&self) -> impl Iterator<Item = (&AssetClass, &ClassFilters)> {
        self.classes.iter()
    }

    /// Filter definitions for a class; empty if the class has none.
    pub fn definitions(&self, asset_class: AssetClass) -> &[FilterDefinition] {
        self.classes
            .get(&asset_class)
            .map(|c| c.definitions.as_slice())
            .unwrap_or(&[])
    }

    pub fn definition(
        &self,
        asset_class: AssetClass,
        name: &str,
    ) -> Result<&FilterDefinition, CoreError> {
        self.definitions(asset_class)
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| CoreError::UnknownFilter {
                asset_class: asset_class.to_string(),
                name: name.to_string(),
            })
    }

    pub fn presets(&self, asset_class: AssetClass) -> &[PresetScreen] {
        self.classes
            .get(&asset_class)
            .map(|c| c.presets.as_slice())
            .unwrap_or(&[])
    }

    pub fn preset(&self, asset_class: AssetClass, id: &str) -> Result<&PresetScreen, CoreError> {
        self.presets(asset_class)
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::UnknownPreset(format!("{asset_class}/{id}")))
    }
}
