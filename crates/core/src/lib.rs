pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

use models::{
    analytics::{AccountSummary, PortfolioSummary, Projection, SeriesPoint},
    asset::{Asset, AssetClass},
    filter::{FilterCatalog, FilterDefinition, FilterState, PresetScreen},
    holding::{EnrichedHolding, Holding},
    portfolio::Portfolio,
    screen::{ScreenRequest, SortKey},
    settings::DashboardSettings,
};
use services::{
    screener_service::ScreenerService, validation_service::ValidationService,
    valuation_service::ValuationService,
};

use errors::CoreError;

/// Main entry point for the investment dashboard core library.
///
/// Holds configuration only (settings and the filter catalog). Every
/// operation takes the holdings or assets it works on as arguments and
/// returns a fresh value, so calls are independent and can be repeated on
/// every keystroke without coordination.
#[must_use]
pub struct InvestmentDashboard {
    settings: DashboardSettings,
    catalog: FilterCatalog,
    validation_service: ValidationService,
    valuation_service: ValuationService,
    screener_service: ScreenerService,
}

impl std::fmt::Debug for InvestmentDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentDashboard")
            .field("settings", &self.settings)
            .field("asset_classes", &self.catalog.classes().count())
            .finish()
    }
}

impl InvestmentDashboard {
    /// Create a dashboard with default settings and the built-in catalog.
    pub fn create_new() -> Result<Self, CoreError> {
        Self::with_config(DashboardSettings::default(), FilterCatalog::builtin()?)
    }

    /// Create a dashboard from explicit configuration.
    /// The catalog is validated before it is accepted.
    pub fn with_config(
        settings: DashboardSettings,
        catalog: FilterCatalog,
    ) -> Result<Self, CoreError> {
        let validation_service = ValidationService::new();
        validation_service.validate_catalog(&catalog)?;
        Ok(Self {
            valuation_service: ValuationService::with_settings(settings.clone()),
            screener_service: ScreenerService::new(),
            validation_service,
            settings,
            catalog,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    // ── Record loading ──────────────────────────────────────────────

    /// Parse and validate portfolios supplied by the holding repository.
    pub fn load_portfolios(&self, json: &str) -> Result<Vec<Portfolio>, CoreError> {
        self.validation_service.parse_portfolios(json)
    }

    /// Parse and validate assets supplied by the asset repository.
    pub fn load_assets(&self, json: &str) -> Result<Vec<Asset>, CoreError> {
        self.validation_service.parse_assets(json)
    }

    /// Check a holding's history against its current value using the
    /// configured tolerance.
    pub fn check_history(&self, holding: &Holding) -> Result<(), CoreError> {
        self.validation_service
            .check_history_reconciles(holding, self.settings.reconciliation_tolerance)
    }

    // ── Valuation ───────────────────────────────────────────────────

    #[must_use]
    pub fn value_holding(&self, holding: &Holding) -> EnrichedHolding {
        self.valuation_service.value_holding(holding)
    }

    #[must_use]
    pub fn aggregate_portfolio(&self, portfolio: &Portfolio) -> PortfolioSummary {
        self.valuation_service.aggregate_portfolio(portfolio)
    }

    #[must_use]
    pub fn aggregate_account(&self, portfolios: &[Portfolio]) -> AccountSummary {
        self.valuation_service.aggregate_account(portfolios)
    }

    /// Projected value at `horizon_months`, or the configured horizon.
    #[must_use]
    pub fn project_future_value(&self, holding: &Holding, horizon_months: Option<u32>) -> f64 {
        self.projection(holding, horizon_months).projected_value
    }

    #[must_use]
    pub fn projection(&self, holding: &Holding, horizon_months: Option<u32>) -> Projection {
        let horizon = horizon_months.unwrap_or(self.settings.projection_horizon_months);
        self.valuation_service.projection(holding, horizon)
    }

    /// Aggregate performance series across portfolios, using the configured
    /// gap policy.
    #[must_use]
    pub fn performance_series(&self, portfolios: &[Portfolio]) -> Vec<SeriesPoint> {
        self.valuation_service.performance_series(
            portfolios.iter().flat_map(|p| p.holdings.iter()),
            self.settings.series_gap_policy,
        )
    }

    // ── Screening ───────────────────────────────────────────────────

    /// Filter definitions for a class.
    #[must_use]
    pub fn filter_definitions(&self, asset_class: AssetClass) -> &[FilterDefinition] {
        self.catalog.definitions(asset_class)
    }

    /// Preset screens for a class.
    #[must_use]
    pub fn presets(&self, asset_class: AssetClass) -> &[PresetScreen] {
        self.catalog.presets(asset_class)
    }

    /// Screen `assets` for one class with a query, filter state and optional sort.
    pub fn screen<'a>(
        &self,
        assets: &'a [Asset],
        asset_class: AssetClass,
        query: &str,
        filters: &FilterState,
        sort: Option<SortKey>,
    ) -> Result<Vec<&'a Asset>, CoreError> {
        let request = ScreenRequest {
            asset_class,
            query: query.to_string(),
            filters: filters.clone(),
            sort,
        };
        self.run_screen(assets, &request)
    }

    pub fn run_screen<'a>(
        &self,
        assets: &'a [Asset],
        request: &ScreenRequest,
    ) -> Result<Vec<&'a Asset>, CoreError> {
        self.screener_service.screen(&self.catalog, assets, request)
    }

    /// Swap the request's filters and sort for those of a preset.
    pub fn apply_preset(
        &self,
        request: &ScreenRequest,
        preset_id: &str,
    ) -> Result<ScreenRequest, CoreError> {
        self.screener_service
            .apply_preset(&self.catalog, request, preset_id)
    }

    /// Apply a preset to a fresh request with `query` and run it.
    pub fn screen_preset<'a>(
        &self,
        assets: &'a [Asset],
        asset_class: AssetClass,
        preset_id: &str,
        query: &str,
    ) -> Result<Vec<&'a Asset>, CoreError> {
        let base = ScreenRequest::new(asset_class).with_query(query);
        let request = self.apply_preset(&base, preset_id)?;
        self.run_screen(assets, &request)
    }
}
