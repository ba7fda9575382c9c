//! Persisted transaction records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core_types::{OrderId, TransactionRowId};
use crate::order::{Order, OrderStatus};

/// Client environment captured at save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMetadata {
    /// The client cannot see its own public address; the store may fill it in.
    pub ip: String,
    pub user_agent: String,
    pub languages: Vec<String>,
    pub viewport: String,
    pub platform: String,
    pub vendor: String,
    pub simulated: bool,
    pub captured_at: DateTime<Utc>,
}

/// Insert payload for a completed order
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub ff_order_id: OrderId,
    pub status: OrderStatus,
    pub raw_api_response: Value,
    pub client_metadata: Value,
    pub amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub destination_address: String,
    pub deposit_address: String,
    pub expiration_time: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn from_order(
        order: &Order,
        status: OrderStatus,
        raw_api_response: Value,
        client_metadata: Value,
    ) -> Self {
        Self {
            ff_order_id: order.order_id.clone(),
            status,
            raw_api_response,
            client_metadata,
            amount: order.deposit_amount,
            from_currency: order.from_currency.clone(),
            to_currency: order.to_currency.clone(),
            destination_address: order.destination_address.clone(),
            deposit_address: order.deposit_address.clone(),
            expiration_time: order.expires_at,
        }
    }
}

/// Store-side record, unique per `ff_order_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTransaction {
    pub id: TransactionRowId,
    pub ff_order_id: OrderId,
    pub status: OrderStatus,
    pub raw_api_response: Option<Value>,
    pub client_metadata: Option<Value>,
    pub amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub destination_address: String,
    pub deposit_address: String,
    pub expiration_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
