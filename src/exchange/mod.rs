//! Exchange backend boundary
//!
//! The bridge never prices or executes swaps itself. Everything that touches
//! the exchange goes through [`ExchangeApi`], reached over the network by
//! [`HttpExchangeApi`] in production and scripted in tests.

pub mod error;
pub mod http;
pub mod mock;
pub mod types;

use async_trait::async_trait;

pub use error::BridgeError;
pub use http::HttpExchangeApi;
pub use mock::ScriptedExchange;
pub use types::{
    CreateRequest, ExchangeOrder, OrderPayload, OrderType, PriceRequest, PriceResponse,
    RawCurrency, StatusRequest,
};

#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// List tradable currencies with their send/receive flags
    async fn list_currencies(&self) -> Result<Vec<RawCurrency>, BridgeError>;

    /// Price a pair for the given amount
    async fn quote(&self, req: &PriceRequest) -> Result<PriceResponse, BridgeError>;

    /// Submit a new bridge order
    async fn create_order(&self, req: &CreateRequest) -> Result<OrderPayload, BridgeError>;

    /// Fetch the current state of an order. `token` is the credential
    /// returned at creation.
    async fn check_status(&self, req: &StatusRequest) -> Result<OrderPayload, BridgeError>;
}
