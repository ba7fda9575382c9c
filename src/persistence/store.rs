//! Transaction store contract

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::models::{NewTransaction, PersistedTransaction};
use crate::core_types::{OrderId, TransactionRowId};
use crate::order::OrderStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Another writer already inserted this `ff_order_id`
    #[error("Duplicate transaction for order {0}")]
    UniqueViolation(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Store write failed: {0}")]
    Write(String),

    #[error("Failed to decode stored row: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::UniqueViolation(_) => "UNIQUE_VIOLATION",
            StoreError::Query(_) => "STORE_QUERY",
            StoreError::Write(_) => "STORE_WRITE",
            StoreError::Decode(_) => "STORE_DECODE",
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

/// Persistent record store keyed uniquely by external order id.
///
/// The unique key is the only concurrency control for saves: implementations
/// must reject a second insert for the same `ff_order_id` with
/// [`StoreError::UniqueViolation`].
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PersistedTransaction>, StoreError>;

    async fn insert(&self, record: &NewTransaction) -> Result<TransactionRowId, StoreError>;

    /// Overwrite status and raw payload. Returns false when no row matched.
    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        raw_api_response: &Value,
    ) -> Result<bool, StoreError>;
}
