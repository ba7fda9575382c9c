//! Exchange backend wire types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::BridgeError;

/// Response envelope: `{ "code": 0, "msg": "OK", "data": ... }`.
/// Any non-zero code is a rejection.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn into_data(self) -> Result<Value, BridgeError> {
        if self.code != 0 {
            return Err(BridgeError::Rejected {
                code: self.code,
                message: self.msg,
            });
        }
        if self.data.is_null() {
            return Err(BridgeError::Malformed("Envelope has no data".to_string()));
        }
        Ok(self.data)
    }
}

/// Catalog entry as listed by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCurrency {
    pub code: String,
    #[serde(default)]
    pub coin: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub send: u8,
    #[serde(default)]
    pub recv: u8,
}

/// Fixed rate locks the receive amount; float follows the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Fixed,
    Float,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Fixed => "fixed",
            OrderType::Float => "float",
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(OrderType::Fixed),
            "float" => Ok(OrderType::Float),
            other => Err(BridgeError::Validation(format!(
                "Unknown order type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceRequest {
    #[serde(rename = "fromCcy")]
    pub from_ccy: String,
    #[serde(rename = "toCcy")]
    pub to_ccy: String,
    pub amount: Decimal,
    pub direction: &'static str,
    #[serde(rename = "type")]
    pub order_type: OrderType,
}

/// One side of a price quote
#[derive(Debug, Clone, Deserialize)]
pub struct PriceLeg {
    pub code: String,
    pub amount: Decimal,
    #[serde(default)]
    pub rate: Decimal,
    #[serde(default)]
    pub usd: Decimal,
    #[serde(default)]
    pub min: Decimal,
    #[serde(default)]
    pub max: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceResponse {
    pub from: PriceLeg,
    pub to: PriceLeg,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest {
    #[serde(rename = "fromCcy")]
    pub from_ccy: String,
    #[serde(rename = "toCcy")]
    pub to_ccy: String,
    pub amount: Decimal,
    pub direction: &'static str,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(rename = "toAddress")]
    pub to_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusRequest {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderLeg {
    pub code: String,
    pub amount: Decimal,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderTimes {
    /// Unix seconds
    #[serde(default)]
    pub expiration: Option<i64>,
}

/// Order as reported by `create` and `order`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeOrder {
    pub id: String,
    #[serde(default)]
    pub token: String,
    pub status: String,
    pub from: OrderLeg,
    pub to: OrderLeg,
    #[serde(default)]
    pub time: OrderTimes,
}

/// Typed order plus the untouched payload it was parsed from.
/// The raw payload is what gets persisted.
#[derive(Debug, Clone)]
pub struct OrderPayload {
    pub order: ExchangeOrder,
    pub raw: Value,
}

impl OrderPayload {
    pub fn from_raw(raw: Value) -> Result<Self, BridgeError> {
        let order: ExchangeOrder = serde_json::from_value(raw.clone())?;
        Ok(Self { order, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_envelope_ok() {
        let env: Envelope =
            serde_json::from_value(json!({"code": 0, "msg": "OK", "data": {"a": 1}})).unwrap();
        assert_eq!(env.into_data().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_envelope_rejected() {
        let env: Envelope =
            serde_json::from_value(json!({"code": 301, "msg": "Invalid address"})).unwrap();
        assert_eq!(
            env.into_data().unwrap_err(),
            BridgeError::Rejected {
                code: 301,
                message: "Invalid address".into()
            }
        );
    }

    #[test]
    fn test_envelope_missing_data() {
        let env: Envelope = serde_json::from_value(json!({"code": 0, "msg": "OK"})).unwrap();
        assert!(matches!(env.into_data(), Err(BridgeError::Malformed(_))));
    }

    #[test]
    fn test_order_payload_keeps_raw() {
        let raw = json!({
            "id": "FF-ABC123",
            "token": "tok",
            "status": "NEW",
            "from": {"code": "BTC", "amount": "0.5", "address": "bc1qdeposit"},
            "to": {"code": "ETH", "amount": "9.1", "address": "0xdest"},
            "time": {"expiration": 1760000000},
            "extra": {"foo": 1}
        });
        let payload = OrderPayload::from_raw(raw.clone()).unwrap();
        assert_eq!(payload.order.id, "FF-ABC123");
        assert_eq!(payload.order.from.amount, dec!(0.5));
        assert_eq!(payload.order.time.expiration, Some(1760000000));
        assert_eq!(payload.raw, raw);
    }

    #[test]
    fn test_order_payload_malformed() {
        let err = OrderPayload::from_raw(json!({"id": 5})).unwrap_err();
        assert!(matches!(err, BridgeError::Malformed(_)));
    }

    #[test]
    fn test_order_type_parse() {
        assert_eq!("FIXED".parse::<OrderType>().unwrap(), OrderType::Fixed);
        assert_eq!("float".parse::<OrderType>().unwrap(), OrderType::Float);
        assert!("market".parse::<OrderType>().is_err());
    }
}
