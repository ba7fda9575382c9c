//! Scripted exchange for tests and offline runs
//!
//! Each endpoint answers from a canned result. Status checks pop from a
//! queue so a test can walk an order through its lifecycle; the last entry
//! is repeated once the queue is drained.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::BridgeError;
use super::types::{
    CreateRequest, OrderPayload, PriceRequest, PriceResponse, RawCurrency, StatusRequest,
};
use super::ExchangeApi;

#[derive(Default)]
pub struct ScriptedExchange {
    currencies: Mutex<Option<Result<Vec<RawCurrency>, BridgeError>>>,
    price: Mutex<Option<Result<Value, BridgeError>>>,
    create: Mutex<Option<Result<Value, BridgeError>>>,
    statuses: Mutex<VecDeque<Result<Value, BridgeError>>>,
    last_status: Mutex<Option<Result<Value, BridgeError>>>,
    status_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currencies(self, result: Result<Vec<RawCurrency>, BridgeError>) -> Self {
        *self.currencies.lock().unwrap_or_else(|p| p.into_inner()) = Some(result);
        self
    }

    pub fn with_price(self, result: Result<Value, BridgeError>) -> Self {
        *self.price.lock().unwrap_or_else(|p| p.into_inner()) = Some(result);
        self
    }

    pub fn with_create(self, result: Result<Value, BridgeError>) -> Self {
        *self.create.lock().unwrap_or_else(|p| p.into_inner()) = Some(result);
        self
    }

    pub fn push_status(&self, result: Result<Value, BridgeError>) {
        self.statuses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(result);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

/// Minimal order payload in the backend's wire shape
pub fn order_payload(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "token": format!("{}-token", id),
        "status": status,
        "from": {"code": "BTC", "amount": "0.5", "address": "bc1qdepositaddress"},
        "to": {"code": "ETH", "amount": "9.25", "address": "0xdestination"},
        "time": {"expiration": 1893456000}
    })
}

#[async_trait]
impl ExchangeApi for ScriptedExchange {
    async fn list_currencies(&self) -> Result<Vec<RawCurrency>, BridgeError> {
        self.currencies
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .unwrap_or_else(|| Err(BridgeError::Network("no currencies scripted".into())))
    }

    async fn quote(&self, _req: &PriceRequest) -> Result<PriceResponse, BridgeError> {
        let scripted = self
            .price
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .unwrap_or_else(|| Err(BridgeError::Network("no price scripted".into())))?;
        Ok(serde_json::from_value(scripted)?)
    }

    async fn create_order(&self, _req: &CreateRequest) -> Result<OrderPayload, BridgeError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .create
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .unwrap_or_else(|| Err(BridgeError::Network("no order scripted".into())))?;
        OrderPayload::from_raw(scripted)
    }

    async fn check_status(&self, _req: &StatusRequest) -> Result<OrderPayload, BridgeError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .statuses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front();
        let result = {
            let mut last = self.last_status.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(next) = next {
                *last = Some(next);
            }
            last.clone()
                .unwrap_or_else(|| Err(BridgeError::Network("no status scripted".into())))
        };
        OrderPayload::from_raw(result?)
    }
}
