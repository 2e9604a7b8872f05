use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::holding::Holding;

/// A named collection of holdings owned by one account.
///
/// Holding order is insertion order and carries no meaning for any
/// calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    /// Create an empty portfolio with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            holdings: Vec::new(),
        }
    }

    /// Create a portfolio pre-seeded with holdings.
    pub fn with_holdings(name: impl Into<String>, holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            ..Self::new(name)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
