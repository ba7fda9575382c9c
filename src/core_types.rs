//! Core types used throughout the system
//!
//! Identifiers shared by the order, persistence and reconcile modules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bridge order ID - assigned by the exchange backend.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - **Unique**: Stored as `ff_order_id` under a UNIQUE constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty IDs come from half-initialised orders and are never persisted.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Currency code as used by the exchange backend (e.g. "BTC", "USDTTRC").
pub type CurrencyCode = String;

/// Store-assigned row ID of a persisted transaction
pub type TransactionRowId = i64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_empty() {
        assert!(OrderId::new("").is_empty());
        assert!(OrderId::new("   ").is_empty());
        assert!(!OrderId::new("FF-ABC123").is_empty());
    }

    #[test]
    fn test_order_id_serde_transparent() {
        let id = OrderId::new("FF-ABC123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"FF-ABC123\"");
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
