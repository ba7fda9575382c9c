//! Order model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::OrderStatus;
use crate::core_types::{CurrencyCode, OrderId};
use crate::exchange::{BridgeError, OrderPayload, OrderType};

/// Input for [`super::OrderService::create_order`]
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub amount: Decimal,
    pub destination_address: String,
    pub order_type: OrderType,
}

/// One bridge transaction as seen by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub deposit_amount: Decimal,
    pub destination_address: String,
    pub deposit_address: String,
    /// Credential for status polling
    #[serde(rename = "ffOrderToken")]
    pub order_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub current_status: OrderStatus,
    /// Last payload received from the exchange. Required before persisting.
    pub raw_api_response: Option<Value>,
}

impl Order {
    /// Build from a `create` response
    pub fn from_payload(payload: OrderPayload) -> Result<Self, BridgeError> {
        let OrderPayload { order, raw } = payload;
        if order.id.trim().is_empty() {
            return Err(BridgeError::Malformed("Order has no id".to_string()));
        }
        let status = OrderStatus::from_upstream(&order.status)?;

        Ok(Self {
            order_id: OrderId::new(order.id),
            from_currency: order.from.code,
            to_currency: order.to.code,
            deposit_amount: order.from.amount,
            destination_address: order.to.address,
            deposit_address: order.from.address,
            order_token: order.token,
            expires_at: order.time.expiration.and_then(unix_to_utc),
            current_status: status,
            raw_api_response: Some(raw),
        })
    }

    /// Apply a polled snapshot. Identity and amounts never change; status,
    /// deposit address, deadline and the raw payload do.
    pub fn apply_snapshot(&mut self, snapshot: StatusSnapshot) {
        self.current_status = snapshot.status;
        if let Some(addr) = snapshot.deposit_address {
            self.deposit_address = addr;
        }
        if snapshot.expires_at.is_some() {
            self.expires_at = snapshot.expires_at;
        }
        self.raw_api_response = Some(snapshot.raw);
    }

    /// `status` field of the raw payload, as the exchange spelled it
    pub fn upstream_status(&self) -> Option<&str> {
        self.raw_api_response
            .as_ref()
            .and_then(|raw| raw.get("status"))
            .and_then(Value::as_str)
    }
}

/// Result of one status poll
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub status: OrderStatus,
    pub deposit_address: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub raw: Value,
}

impl StatusSnapshot {
    pub fn from_payload(payload: OrderPayload) -> Result<Self, BridgeError> {
        let OrderPayload { order, raw } = payload;
        let status = OrderStatus::from_upstream(&order.status)?;
        let deposit_address = Some(order.from.address).filter(|a| !a.is_empty());

        Ok(Self {
            status,
            deposit_address,
            expires_at: order.time.expiration.and_then(unix_to_utc),
            raw,
        })
    }
}

fn unix_to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock::order_payload;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_from_create_payload() {
        let payload = OrderPayload::from_raw(order_payload("FF-ABC123", "NEW")).unwrap();
        let order = Order::from_payload(payload).unwrap();

        assert_eq!(order.order_id.as_str(), "FF-ABC123");
        assert_eq!(order.from_currency, "BTC");
        assert_eq!(order.to_currency, "ETH");
        assert_eq!(order.deposit_amount, dec!(0.5));
        assert_eq!(order.deposit_address, "bc1qdepositaddress");
        assert_eq!(order.destination_address, "0xdestination");
        assert_eq!(order.order_token, "FF-ABC123-token");
        assert_eq!(order.current_status, OrderStatus::New);
        assert_eq!(order.expires_at.map(|t| t.timestamp()), Some(1893456000));
        assert_eq!(order.upstream_status(), Some("NEW"));
    }

    #[test]
    fn test_from_payload_rejects_empty_id() {
        let payload = OrderPayload::from_raw(order_payload("", "NEW")).unwrap();
        assert!(matches!(
            Order::from_payload(payload),
            Err(BridgeError::Malformed(_))
        ));
    }

    #[test]
    fn test_apply_snapshot_keeps_identity() {
        let payload = OrderPayload::from_raw(order_payload("FF-1", "NEW")).unwrap();
        let mut order = Order::from_payload(payload).unwrap();

        let mut raw = order_payload("FF-1", "EXCHANGE");
        raw["from"]["address"] = json!("");
        let snapshot = StatusSnapshot::from_payload(OrderPayload::from_raw(raw.clone()).unwrap())
            .unwrap();
        order.apply_snapshot(snapshot);

        assert_eq!(order.order_id.as_str(), "FF-1");
        assert_eq!(order.current_status, OrderStatus::Processing);
        // Empty address in a snapshot does not wipe the known one
        assert_eq!(order.deposit_address, "bc1qdepositaddress");
        assert_eq!(order.raw_api_response, Some(raw));
        assert_eq!(order.upstream_status(), Some("EXCHANGE"));
    }

    #[test]
    fn test_order_token_wire_name() {
        let payload = OrderPayload::from_raw(order_payload("FF-2", "NEW")).unwrap();
        let order = Order::from_payload(payload).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["ffOrderToken"], json!("FF-2-token"));
        assert_eq!(json["current_status"], json!("new"));
    }
}
