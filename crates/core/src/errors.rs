use thiserror::Error;

/// Unified error type for the entire investment-dashboard-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Arithmetic guards (zero cost basis, averages over nothing) are not errors:
/// those return `0`. Errors here are either bad records at the boundary or a
/// mismatch between the filter configuration and the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Records ─────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Screening configuration ─────────────────────────────────────
    #[error("Unknown asset class: {0}")]
    UnknownAssetClass(String),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown filter '{name}' for asset class {asset_class}")]
    UnknownFilter { asset_class: String, name: String },

    #[error("Filter '{name}' expects a {expected} selection, got {found}")]
    FilterKindMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Unknown preset screen: {0}")]
    UnknownPreset(String),

    #[error("Invalid filter definition: {0}")]
    InvalidFilterDefinition(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
