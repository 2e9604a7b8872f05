pub mod analytics;
pub mod asset;
pub mod filter;
pub mod holding;
pub mod portfolio;
pub mod screen;
pub mod settings;
