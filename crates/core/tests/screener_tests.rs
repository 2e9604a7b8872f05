// ═══════════════════════════════════════════════════════════════════
// Screener Tests — query, filters, presets, sorting
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use investment_dashboard_core::errors::CoreError;
use investment_dashboard_core::models::asset::{
    Asset, AssetClass, Bond, Commodity, Etf, MutualFund, Stock,
};
use investment_dashboard_core::models::filter::{FilterCatalog, FilterSelection, FilterState};
use investment_dashboard_core::models::screen::{ScreenRequest, SortKey};
use investment_dashboard_core::services::screener_service::ScreenerService;

// ═══════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════

#[allow(clippy::too_many_arguments)]
fn stock(
    symbol: &str,
    name: &str,
    sector: &str,
    exchange: &str,
    price: f64,
    change_percent: f64,
    volume: &str,
    market_cap: &str,
    dividend_yield: Option<f64>,
) -> Asset {
    Asset::Stock(Stock {
        symbol: symbol.into(),
        name: name.into(),
        price,
        change: 0.0,
        change_percent,
        volume: volume.into(),
        market_cap: market_cap.into(),
        sector: sector.into(),
        exchange: exchange.into(),
        pe_ratio: None,
        dividend_yield,
    })
}

fn bond(symbol: &str, name: &str, issuer: &str, bond_type: &str, rating: &str, ytm: f64, year: i32) -> Asset {
    Asset::Bond(Bond {
        symbol: symbol.into(),
        name: name.into(),
        issuer: issuer.into(),
        bond_type: bond_type.into(),
        price: 100.0,
        change_percent: 0.0,
        coupon_rate: ytm - 0.5,
        yield_to_maturity: ytm,
        credit_rating: rating.into(),
        maturity_date: NaiveDate::from_ymd_opt(year, 6, 30).unwrap(),
    })
}

fn fund(symbol: &str, name: &str, category: &str, rating: u8, min: f64, ret: f64, expense: f64) -> Asset {
    Asset::MutualFund(MutualFund {
        symbol: symbol.into(),
        name: name.into(),
        nav: 100.0,
        change_percent: 0.0,
        category: category.into(),
        fund_family: String::new(),
        expense_ratio: expense,
        min_investment: min,
        one_year_return: Some(ret),
        morningstar_rating: Some(rating),
    })
}

fn etf(symbol: &str, name: &str, category: &str, expense: f64, div: f64) -> Asset {
    Asset::Etf(Etf {
        symbol: symbol.into(),
        name: name.into(),
        price: 100.0,
        change_percent: 0.0,
        volume: "1M".into(),
        category: category.into(),
        expense_ratio: expense,
        aum: String::new(),
        dividend_yield: Some(div),
    })
}

fn commodity(symbol: &str, name: &str, category: &str, price: f64, volume: &str) -> Asset {
    Asset::Commodity(Commodity {
        symbol: symbol.into(),
        name: name.into(),
        price,
        change: 0.0,
        change_percent: 0.0,
        category: category.into(),
        unit: String::new(),
        volume: volume.into(),
    })
}

/// Mixed-class market, deliberately not partitioned.
fn market() -> Vec<Asset> {
    vec![
        stock("AAPL", "Apple Inc.", "Technology", "NASDAQ", 187.5, 1.13, "89M", "2.9T", Some(0.5)),
        bond("UST10Y", "10-Year Treasury Note", "U.S. Treasury", "Treasury", "AAA", 4.2, 2034),
        stock("MSFT", "Microsoft Corp", "Technology", "NASDAQ", 410.2, 0.85, "22M", "3.1T", Some(0.7)),
        stock("XOM", "Exxon Mobil", "Energy", "NYSE", 99.0, -1.9, "15M", "410B", Some(3.4)),
        bond("ACME31", "Acme 2031", "Acme Corp", "Corporate", "BB", 7.8, 2031),
        stock("JNJ", "Johnson & Johnson", "Healthcare", "NYSE", 152.3, -0.4, "7.5M", "370B", Some(3.0)),
        commodity("GC", "Gold", "Metals", 2350.0, "180K"),
        stock("NVDA", "NVIDIA", "Technology", "NASDAQ", 880.1, 4.2, "310M", "2.2T", None),
        bond("AAPL31", "Apple 3.35% 2031", "Apple Inc.", "Corporate", "AA", 4.9, 2031),
        stock("PFE", "Pfizer", "Healthcare", "NYSE", 28.1, -0.4, "31M", "160B", Some(5.9)),
        commodity("CL", "Crude Oil", "Energy", 78.2, "350K"),
        etf("VOO", "Vanguard S&P 500 ETF", "Large Cap Blend", 0.03, 1.3),
        etf("QQQ", "Invesco QQQ Trust", "Technology", 0.20, 0.6),
        etf("SCHD", "Schwab US Dividend Equity ETF", "Dividend", 0.06, 3.5),
        fund("VFIAX", "Vanguard 500 Index Admiral", "Large Blend", 5, 3000.0, 24.1, 0.04),
        fund("FCNTX", "Fidelity Contrafund", "Large Growth", 4, 0.0, 33.0, 0.39),
        fund("PRWCX", "T. Rowe Price Capital Appreciation", "Large Blend", 5, 2500.0, 18.0, 0.70),
    ]
}

fn catalog() -> FilterCatalog {
    FilterCatalog::builtin().unwrap()
}

fn symbols(results: &[&Asset]) -> Vec<String> {
    results.iter().map(|a| a.symbol().to_string()).collect()
}

fn run(request: &ScreenRequest) -> Vec<String> {
    let assets = market();
    let svc = ScreenerService::new();
    symbols(&svc.screen(&catalog(), &assets, request).unwrap())
}

// ═══════════════════════════════════════════════════════════════════
// Class guard & query
// ═══════════════════════════════════════════════════════════════════

mod query {
    use super::*;

    #[test]
    fn only_requested_class_participates() {
        let result = run(&ScreenRequest::new(AssetClass::Stock));
        assert_eq!(result, vec!["AAPL", "MSFT", "XOM", "JNJ", "NVDA", "PFE"]);
    }

    #[test]
    fn empty_class_is_empty_result() {
        let svc = ScreenerService::new();
        let stocks_only: Vec<Asset> = market()
            .into_iter()
            .filter(|a| a.asset_class() == AssetClass::Stock)
            .collect();
        let result = svc
            .screen(&catalog(), &stocks_only, &ScreenRequest::new(AssetClass::Bond))
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn technology_apple_returns_exactly_apple() {
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_query("AAPL")
            .with_filters(FilterState::new().checkbox("sector", ["Technology"]));
        assert_eq!(run(&request), vec!["AAPL"]);
    }

    #[test]
    fn case_insensitive_name_match() {
        let request = ScreenRequest::new(AssetClass::Stock).with_query("aPpLe");
        assert_eq!(run(&request), vec!["AAPL"]);
    }

    #[test]
    fn bond_query_searches_issuer() {
        let request = ScreenRequest::new(AssetClass::Bond).with_query("acme corp");
        assert_eq!(run(&request), vec!["ACME31"]);
        let request = ScreenRequest::new(AssetClass::Bond).with_query("treasury");
        assert_eq!(run(&request), vec!["UST10Y"]);
    }

    #[test]
    fn issuer_is_not_searched_for_stocks() {
        // "Inc." appears only in Apple's name among stocks
        let request = ScreenRequest::new(AssetClass::Stock).with_query("inc.");
        assert_eq!(run(&request), vec!["AAPL"]);
    }

    #[test]
    fn whitespace_query_matches_everything() {
        let request = ScreenRequest::new(AssetClass::Commodity).with_query("   ");
        assert_eq!(run(&request), vec!["GC", "CL"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let request = ScreenRequest::new(AssetClass::Stock).with_query("zzzz");
        assert!(run(&request).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Filters
// ═══════════════════════════════════════════════════════════════════

mod filters {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().range("price", 99.0, 187.5));
        assert_eq!(run(&request), vec!["AAPL", "XOM", "JNJ"]);
    }

    #[test]
    fn range_parses_human_magnitudes() {
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().range("market_cap", 1e12, 5e12));
        assert_eq!(run(&request), vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn range_excludes_missing_field() {
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().range("dividend_yield", 0.0, 10.0));
        assert_eq!(run(&request), vec!["AAPL", "MSFT", "XOM", "JNJ", "PFE"]);
    }

    #[test]
    fn range_over_derived_field() {
        let request = ScreenRequest::new(AssetClass::Bond)
            .with_filters(FilterState::new().range("maturity_year", 2030.0, 2032.0));
        assert_eq!(run(&request), vec!["ACME31", "AAPL31"]);
    }

    #[test]
    fn checkbox_matches_any_selected() {
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().checkbox("sector", ["Energy", "Healthcare"]));
        assert_eq!(run(&request), vec!["XOM", "JNJ", "PFE"]);
    }

    #[test]
    fn empty_checkbox_is_neutral() {
        let unfiltered = run(&ScreenRequest::new(AssetClass::Stock));
        let empty: Vec<String> = Vec::new();
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().checkbox("sector", empty));
        assert_eq!(run(&request), unfiltered);
    }

    #[test]
    fn radio_matches_exactly() {
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().radio("exchange", "NYSE"));
        assert_eq!(run(&request), vec!["XOM", "JNJ", "PFE"]);
    }

    #[test]
    fn radio_on_numeric_field() {
        let request = ScreenRequest::new(AssetClass::MutualFund)
            .with_filters(FilterState::new().radio("rating", "5"));
        assert_eq!(run(&request), vec!["VFIAX", "PRWCX"]);
    }

    #[test]
    fn filters_combine_with_and() {
        let request = ScreenRequest::new(AssetClass::Stock).with_filters(
            FilterState::new()
                .checkbox("sector", ["Technology"])
                .radio("exchange", "NASDAQ")
                .range("price", 0.0, 500.0),
        );
        assert_eq!(run(&request), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn query_and_filters_combine() {
        let request = ScreenRequest::new(AssetClass::Etf)
            .with_query("vanguard")
            .with_filters(FilterState::new().range("expense_ratio", 0.0, 0.1));
        assert_eq!(run(&request), vec!["VOO"]);
    }

    #[test]
    fn unknown_filter_is_an_error() {
        let assets = market();
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().checkbox("credit_rating", ["AAA"]));
        let err = ScreenerService::new()
            .screen(&catalog(), &assets, &request)
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownFilter { ref name, .. } if name == "credit_rating"));
    }

    #[test]
    fn kind_mismatch_is_an_error() {
        let assets = market();
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filter("sector", FilterSelection::Radio("Energy".into()));
        let err = ScreenerService::new()
            .screen(&catalog(), &assets, &request)
            .unwrap_err();
        assert!(matches!(err, CoreError::FilterKindMismatch { .. }));
    }

    #[test]
    fn unconfigured_option_is_an_error() {
        let assets = market();
        let request = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().checkbox("sector", ["Crypto"]));
        assert!(ScreenerService::new()
            .screen(&catalog(), &assets, &request)
            .is_err());
    }

    #[test]
    fn screening_is_deterministic_and_leaves_input_alone() {
        let assets = market();
        let before = assets.clone();
        let svc = ScreenerService::new();
        let request = ScreenRequest::new(AssetClass::Stock).with_sort(SortKey::Gainers);
        let first = symbols(&svc.screen(&catalog(), &assets, &request).unwrap());
        let second = symbols(&svc.screen(&catalog(), &assets, &request).unwrap());
        assert_eq!(first, second);
        assert_eq!(assets, before);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sorting
// ═══════════════════════════════════════════════════════════════════

mod sorting {
    use super::*;

    fn sorted(class: AssetClass, key: SortKey) -> Vec<String> {
        run(&ScreenRequest::new(class).with_sort(key))
    }

    #[test]
    fn gainers_keep_ties_in_input_order() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::Gainers),
            vec!["NVDA", "AAPL", "MSFT", "JNJ", "PFE", "XOM"]
        );
    }

    #[test]
    fn losers_keep_ties_in_input_order() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::Losers),
            vec!["XOM", "JNJ", "PFE", "MSFT", "AAPL", "NVDA"]
        );
    }

    #[test]
    fn volume_compares_magnitudes() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::Volume),
            vec!["NVDA", "AAPL", "PFE", "MSFT", "XOM", "JNJ"]
        );
        assert_eq!(sorted(AssetClass::Commodity, SortKey::Volume), vec!["CL", "GC"]);
    }

    #[test]
    fn name_is_case_insensitive_alphabetical() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::Name),
            vec!["AAPL", "XOM", "JNJ", "MSFT", "NVDA", "PFE"]
        );
    }

    #[test]
    fn price_high_and_low() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::PriceHigh),
            vec!["NVDA", "MSFT", "AAPL", "JNJ", "XOM", "PFE"]
        );
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::PriceLow),
            vec!["PFE", "XOM", "JNJ", "AAPL", "MSFT", "NVDA"]
        );
    }

    #[test]
    fn missing_sort_field_goes_last() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::YieldDesc),
            vec!["PFE", "XOM", "JNJ", "MSFT", "AAPL", "NVDA"]
        );
    }

    #[test]
    fn yield_means_ytm_for_bonds() {
        assert_eq!(
            sorted(AssetClass::Bond, SortKey::YieldDesc),
            vec!["ACME31", "AAPL31", "UST10Y"]
        );
    }

    #[test]
    fn market_cap_desc() {
        assert_eq!(
            sorted(AssetClass::Stock, SortKey::MarketCapDesc),
            vec!["MSFT", "AAPL", "NVDA", "XOM", "JNJ", "PFE"]
        );
    }

    #[test]
    fn fund_sorts() {
        assert_eq!(
            sorted(AssetClass::MutualFund, SortKey::ExpenseAsc),
            vec!["VFIAX", "FCNTX", "PRWCX"]
        );
        assert_eq!(
            sorted(AssetClass::MutualFund, SortKey::ReturnDesc),
            vec!["FCNTX", "VFIAX", "PRWCX"]
        );
        assert_eq!(
            sorted(AssetClass::MutualFund, SortKey::RatingDesc),
            vec!["VFIAX", "PRWCX", "FCNTX"]
        );
    }

    #[test]
    fn inapplicable_key_is_rejected() {
        let assets = market();
        let svc = ScreenerService::new();
        for (class, key) in [
            (AssetClass::Stock, SortKey::ExpenseAsc),
            (AssetClass::Bond, SortKey::Volume),
            (AssetClass::Commodity, SortKey::RatingDesc),
        ] {
            let result = svc.screen(&catalog(), &assets, &ScreenRequest::new(class).with_sort(key));
            assert!(
                matches!(result, Err(CoreError::UnknownSortKey(_))),
                "{key} on {class} should be rejected"
            );
        }
    }

    #[test]
    fn unreadable_volume_goes_last() {
        let assets = vec![
            commodity("NA", "Unquoted", "Energy", 10.0, "N/A"),
            commodity("BLANK", "Blank", "Energy", 20.0, ""),
            commodity("HAS", "Quoted", "Energy", 30.0, "10M"),
            commodity("LOW", "Thin", "Energy", 40.0, "5K"),
        ];
        let mut list: Vec<&Asset> = assets.iter().collect();
        ScreenerService::sort_assets(&mut list, AssetClass::Commodity, SortKey::Volume).unwrap();
        assert_eq!(symbols(&list), vec!["HAS", "LOW", "NA", "BLANK"]);

        let svc = ScreenerService::new();
        let request = ScreenRequest::new(AssetClass::Commodity).with_sort(SortKey::Volume);
        let screened = svc.screen(&catalog(), &assets, &request).unwrap();
        assert_eq!(symbols(&screened), vec!["HAS", "LOW", "NA", "BLANK"]);
    }

    #[test]
    fn blank_market_cap_goes_last() {
        let mut assets = market();
        assets.push(stock("NEWCO", "Newco", "Technology", "NASDAQ", 12.0, 0.0, "", "", None));
        let svc = ScreenerService::new();
        let request = ScreenRequest::new(AssetClass::Stock).with_sort(SortKey::MarketCapDesc);
        assert_eq!(
            symbols(&svc.screen(&catalog(), &assets, &request).unwrap()),
            vec!["MSFT", "AAPL", "NVDA", "XOM", "JNJ", "PFE", "NEWCO"]
        );
    }

    #[test]
    fn descending_of_ascending_reverses_distinct_keys() {
        let assets = market();
        let mut list: Vec<&Asset> = assets
            .iter()
            .filter(|a| a.asset_class() == AssetClass::Stock)
            .collect();
        ScreenerService::sort_assets(&mut list, AssetClass::Stock, SortKey::PriceLow).unwrap();
        let ascending = symbols(&list);
        ScreenerService::sort_assets(&mut list, AssetClass::Stock, SortKey::PriceHigh).unwrap();
        let mut descending = symbols(&list);
        descending.reverse();
        assert_eq!(ascending, descending);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Presets
// ═══════════════════════════════════════════════════════════════════

mod presets {
    use super::*;

    #[test]
    fn apply_replaces_filters_and_keeps_query() {
        let svc = ScreenerService::new();
        let current = ScreenRequest::new(AssetClass::Stock)
            .with_query("n")
            .with_filters(FilterState::new().radio("exchange", "NYSE"))
            .with_sort(SortKey::PriceLow);

        let applied = svc.apply_preset(&catalog(), &current, "tech_leaders").unwrap();
        assert_eq!(applied.query, "n");
        assert_eq!(applied.sort, Some(SortKey::MarketCapDesc));
        assert!(applied.filters.get("exchange").is_none());
        assert_eq!(
            applied.filters.get("sector"),
            Some(&FilterSelection::Checkbox(vec!["Technology".into()]))
        );
    }

    #[test]
    fn sort_only_preset_clears_filters() {
        let svc = ScreenerService::new();
        let current = ScreenRequest::new(AssetClass::Stock)
            .with_filters(FilterState::new().checkbox("sector", ["Energy"]));
        let applied = svc.apply_preset(&catalog(), &current, "top_gainers").unwrap();
        assert!(applied.filters.is_empty());
        assert_eq!(run(&applied), vec!["NVDA", "AAPL", "MSFT", "JNJ", "PFE", "XOM"]);
    }

    #[test]
    fn investment_grade_bonds() {
        let svc = ScreenerService::new();
        let request = svc
            .apply_preset(&catalog(), &ScreenRequest::new(AssetClass::Bond), "investment_grade")
            .unwrap();
        assert_eq!(run(&request), vec!["AAPL31", "UST10Y"]);
    }

    #[test]
    fn high_dividend_etfs() {
        let svc = ScreenerService::new();
        let request = svc
            .apply_preset(&catalog(), &ScreenRequest::new(AssetClass::Etf), "high_dividend")
            .unwrap();
        assert_eq!(run(&request), vec!["SCHD"]);
    }

    #[test]
    fn no_minimum_funds() {
        let svc = ScreenerService::new();
        let request = svc
            .apply_preset(&catalog(), &ScreenRequest::new(AssetClass::MutualFund), "no_minimum")
            .unwrap();
        assert_eq!(run(&request), vec!["FCNTX"]);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let svc = ScreenerService::new();
        let err = svc
            .apply_preset(&catalog(), &ScreenRequest::new(AssetClass::Stock), "moonshots")
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownPreset(_)));
    }
}
