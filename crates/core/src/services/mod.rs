pub mod screener_service;
pub mod validation_service;
pub mod valuation_service;
