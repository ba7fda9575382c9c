//! In-memory transaction store
//!
//! Used when no `postgres_url` is configured and by tests. Enforces the same
//! unique key on `ff_order_id` as the Postgres table.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

use super::models::{NewTransaction, PersistedTransaction};
use super::store::{StoreError, TransactionStore};
use crate::core_types::{OrderId, TransactionRowId};
use crate::order::OrderStatus;

#[derive(Default)]
pub struct InMemoryTransactionStore {
    rows: DashMap<OrderId, PersistedTransaction>,
    next_id: AtomicI64,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, order_id: &OrderId) -> Option<PersistedTransaction> {
        self.rows.get(order_id).map(|r| r.value().clone())
    }

    /// Seed a row directly, e.g. one written by another client
    pub fn seed(&self, record: &NewTransaction) -> TransactionRowId {
        let id = self.allocate_id();
        self.rows
            .insert(record.ff_order_id.clone(), to_row(id, record));
        id
    }

    fn allocate_id(&self) -> TransactionRowId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn to_row(id: TransactionRowId, record: &NewTransaction) -> PersistedTransaction {
    let now = Utc::now();
    PersistedTransaction {
        id,
        ff_order_id: record.ff_order_id.clone(),
        status: record.status,
        raw_api_response: Some(record.raw_api_response.clone()),
        client_metadata: Some(record.client_metadata.clone()),
        amount: record.amount,
        from_currency: record.from_currency.clone(),
        to_currency: record.to_currency.clone(),
        destination_address: record.destination_address.clone(),
        deposit_address: record.deposit_address.clone(),
        expiration_time: record.expiration_time,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<PersistedTransaction>, StoreError> {
        Ok(self.get(order_id))
    }

    async fn insert(&self, record: &NewTransaction) -> Result<TransactionRowId, StoreError> {
        match self.rows.entry(record.ff_order_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(
                record.ff_order_id.to_string(),
            )),
            Entry::Vacant(slot) => {
                let id = self.allocate_id();
                slot.insert(to_row(id, record));
                Ok(id)
            }
        }
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        raw_api_response: &Value,
    ) -> Result<bool, StoreError> {
        match self.rows.get_mut(order_id) {
            Some(mut row) => {
                row.status = status;
                row.raw_api_response = Some(raw_api_response.clone());
                row.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
