use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::errors::CoreError;
use crate::models::asset::{Asset, AssetClass, FieldValue};
use crate::models::filter::{FilterCatalog, FilterDefinition, FilterSelection};
use crate::models::screen::{ScreenRequest, SortDirection, SortKey};
use crate::services::validation_service::ValidationService;
use crate::utils::parse_magnitude;

/// Filters, searches and sorts a collection of market assets.
///
/// Filter behavior comes entirely from the `FilterCatalog`: the screener
/// reads fields only through the names a definition gives it. Results borrow
/// from the input, which is never modified; identical inputs always give the
/// same, order-stable output.
pub struct ScreenerService {
    validation: ValidationService,
}

/// Ordering key extracted once per asset before sorting.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Date(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl ScreenerService {
    pub fn new() -> Self {
        Self {
            validation: ValidationService::new(),
        }
    }

    /// Run a screen.
    ///
    /// 1. Keep only assets of `request.asset_class`
    /// 2. Keep assets whose symbol, name (or issuer, for bonds) contains the
    ///    query, case-insensitively; an empty query keeps everything
    /// 3. Keep assets passing every active filter (logical AND). An asset
    ///    missing a filtered field fails that filter; an empty checkbox
    ///    selection constrains nothing
    /// 4. Stable-sort by `request.sort`, if any
    ///
    /// No matches is an empty `Vec`, not an error. Errors are reserved for
    /// selections the catalog does not describe and sort keys with no field
    /// for the requested class.
    pub fn screen<'a>(
        &self,
        catalog: &FilterCatalog,
        assets: &'a [Asset],
        request: &ScreenRequest,
    ) -> Result<Vec<&'a Asset>, CoreError> {
        let active = self.active_filters(catalog, request)?;
        let query = request.query.trim().to_lowercase();

        let mut results: Vec<&Asset> = assets
            .iter()
            .filter(|a| a.asset_class() == request.asset_class)
            .filter(|a| Self::matches_query(a, &query))
            .filter(|a| {
                active
                    .iter()
                    .all(|(definition, selection)| Self::matches_filter(a, definition, selection))
            })
            .collect();

        if let Some(sort) = request.sort {
            Self::sort_assets(&mut results, request.asset_class, sort)?;
        }

        log::debug!(
            "Screened {} {} assets with {} active filters: {} matches",
            assets.len(),
            request.asset_class,
            active.len(),
            results.len()
        );
        Ok(results)
    }

    /// Replace the request's filters and sort with a preset's, keeping the
    /// query. Presets never merge with the current selection.
    pub fn apply_preset(
        &self,
        catalog: &FilterCatalog,
        request: &ScreenRequest,
        preset_id: &str,
    ) -> Result<ScreenRequest, CoreError> {
        let preset = catalog.preset(request.asset_class, preset_id)?;
        Ok(ScreenRequest {
            asset_class: request.asset_class,
            query: request.query.clone(),
            filters: preset.filters.clone(),
            sort: preset.sort,
        })
    }

    /// Stable sort in place. Assets lacking the sort field, or holding a
    /// figure that cannot be read as a number, go last in either direction.
    ///
    /// Ties keep their incoming order in both directions, so re-sorting an
    /// ascending list descending reverses its key sequence but not the
    /// relative order of tied assets.
    ///
    /// A key with no field for `asset_class` (e.g. `expense_asc` on stocks)
    /// is `UnknownSortKey`.
    pub fn sort_assets(
        assets: &mut Vec<&Asset>,
        asset_class: AssetClass,
        sort: SortKey,
    ) -> Result<(), CoreError> {
        let field = sort.field_for(asset_class).ok_or_else(|| {
            log::warn!("Sort '{sort}' does not apply to {asset_class}");
            CoreError::UnknownSortKey(format!("{sort} for {asset_class}"))
        })?;

        let mut keyed: Vec<(Option<SortValue>, &Asset)> = assets
            .iter()
            .map(|a| (Self::sort_value(a, field, sort), *a))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match sort.direction() {
                SortDirection::Ascending => a.compare(b),
                SortDirection::Descending => b.compare(a),
            },
        });

        *assets = keyed.into_iter().map(|(_, a)| a).collect();
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Resolve the request's filter state against the catalog, dropping
    /// selections that constrain nothing.
    fn active_filters<'c, 'r>(
        &self,
        catalog: &'c FilterCatalog,
        request: &'r ScreenRequest,
    ) -> Result<Vec<(&'c FilterDefinition, &'r FilterSelection)>, CoreError> {
        let mut active = Vec::with_capacity(request.filters.len());
        for (name, selection) in request.filters.iter() {
            let definition = catalog.definition(request.asset_class, name)?;
            self.validation.validate_selection(definition, selection)?;
            if matches!(selection, FilterSelection::Checkbox(values) if values.is_empty()) {
                continue;
            }
            active.push((definition, selection));
        }
        Ok(active)
    }

    /// `query` must already be trimmed and lowercased.
    fn matches_query(asset: &Asset, query: &str) -> bool {
        query.is_empty()
            || asset
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(query))
    }

    fn matches_filter(
        asset: &Asset,
        definition: &FilterDefinition,
        selection: &FilterSelection,
    ) -> bool {
        let Some(value) = asset.field(definition.field_name()) else {
            return false;
        };

        match selection {
            FilterSelection::Range { min, max } => value
                .as_number()
                .is_some_and(|n| n >= *min && n <= *max),
            FilterSelection::Checkbox(values) => {
                values.is_empty() || values.iter().any(|v| value.matches_option(v))
            }
            FilterSelection::Radio(v) => value.matches_option(v),
        }
    }

    fn sort_value(asset: &Asset, field: &str, sort: SortKey) -> Option<SortValue> {
        let value = asset.field(field)?;
        Some(match value {
            FieldValue::Number(n) => SortValue::Number(n),
            FieldValue::Date(d) => SortValue::Date(d),
            FieldValue::Text(s) if sort == SortKey::Name => SortValue::Text(s.to_lowercase()),
            // "89M" → 89e6; blank or "N/A" counts as missing
            FieldValue::Text(s) => SortValue::Number(parse_magnitude(s)?),
        })
    }
}

impl Default for ScreenerService {
    fn default() -> Self {
        Self::new()
    }
}
