//! Order creation and status services

use std::sync::Arc;
use tracing::{info, warn};

use super::types::{CreateOrderRequest, Order, StatusSnapshot};
use crate::currency::CurrencyCatalog;
use crate::exchange::{BridgeError, CreateRequest, ExchangeApi, StatusRequest};

pub struct OrderService {
    api: Arc<dyn ExchangeApi>,
    catalog: Option<Arc<CurrencyCatalog>>,
}

impl OrderService {
    pub fn new(api: Arc<dyn ExchangeApi>) -> Self {
        Self { api, catalog: None }
    }

    /// Also check send/receive capability against the catalog before submitting
    pub fn with_catalog(api: Arc<dyn ExchangeApi>, catalog: Arc<CurrencyCatalog>) -> Self {
        Self {
            api,
            catalog: Some(catalog),
        }
    }

    /// Submit a new bridge order
    pub async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, BridgeError> {
        self.validate(&req).await?;

        let wire = CreateRequest {
            from_ccy: req.from_currency.clone(),
            to_ccy: req.to_currency.clone(),
            amount: req.amount,
            direction: "from",
            order_type: req.order_type,
            to_address: req.destination_address.trim().to_string(),
        };

        let payload = self.api.create_order(&wire).await?;
        let order = Order::from_payload(payload)?;

        info!(
            order_id = %order.order_id,
            from = %order.from_currency,
            to = %order.to_currency,
            amount = %order.deposit_amount,
            "Bridge order created"
        );
        Ok(order)
    }

    /// Poll the exchange for the order's current state.
    /// Failures are logged and reported as `None`; the next poll retries.
    pub async fn check_status(&self, order: &Order) -> Option<StatusSnapshot> {
        if order.order_id.is_empty() {
            return None;
        }

        let req = StatusRequest {
            id: order.order_id.to_string(),
            token: order.order_token.clone(),
        };

        let result = self
            .api
            .check_status(&req)
            .await
            .and_then(StatusSnapshot::from_payload);

        match result {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    order_id = %order.order_id,
                    code = e.code(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Status check failed"
                );
                None
            }
        }
    }

    /// Rebuild an order from its id and token, e.g. when resuming a session
    pub async fn load_order(&self, order_id: &str, token: &str) -> Result<Order, BridgeError> {
        if order_id.trim().is_empty() || token.trim().is_empty() {
            return Err(BridgeError::Validation(
                "Order id and token are required".to_string(),
            ));
        }
        let req = StatusRequest {
            id: order_id.trim().to_string(),
            token: token.trim().to_string(),
        };
        let payload = self.api.check_status(&req).await?;
        Order::from_payload(payload)
    }

    async fn validate(&self, req: &CreateOrderRequest) -> Result<(), BridgeError> {
        if req.from_currency.trim().is_empty() || req.to_currency.trim().is_empty() {
            return Err(BridgeError::Validation(
                "Source and destination currencies are required".to_string(),
            ));
        }
        if req.from_currency.eq_ignore_ascii_case(&req.to_currency) {
            return Err(BridgeError::Validation(
                "Source and destination currencies must differ".to_string(),
            ));
        }
        if req.amount <= rust_decimal::Decimal::ZERO {
            return Err(BridgeError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if req.destination_address.trim().is_empty() {
            return Err(BridgeError::Validation(
                "Destination address is required".to_string(),
            ));
        }

        if let Some(catalog) = &self.catalog {
            match catalog.find(&req.from_currency).await {
                Some(c) if c.can_send() => {}
                _ => return Err(BridgeError::UnsupportedCurrency(req.from_currency.clone())),
            }
            match catalog.find(&req.to_currency).await {
                Some(c) if c.can_receive() => {}
                _ => return Err(BridgeError::UnsupportedCurrency(req.to_currency.clone())),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock::order_payload;
    use crate::exchange::{OrderType, RawCurrency, ScriptedExchange};
    use crate::order::OrderStatus;
    use rust_decimal_macros::dec;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            from_currency: "BTC".into(),
            to_currency: "ETH".into(),
            amount: dec!(0.5),
            destination_address: "0xdestination".into(),
            order_type: OrderType::Float,
        }
    }

    fn raw_currency(code: &str, send: u8, recv: u8) -> RawCurrency {
        RawCurrency {
            code: code.into(),
            coin: code.into(),
            network: code.into(),
            name: code.into(),
            color: String::new(),
            send,
            recv,
        }
    }

    #[tokio::test]
    async fn test_create_order_success() {
        let api = Arc::new(
            ScriptedExchange::new().with_create(Ok(order_payload("FF-ABC123", "NEW"))),
        );
        let svc = OrderService::new(api.clone());

        let order = svc.create_order(request()).await.unwrap();
        assert_eq!(order.order_id.as_str(), "FF-ABC123");
        assert_eq!(order.current_status, OrderStatus::New);
        assert!(order.raw_api_response.is_some());
        assert_eq!(api.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_validation_never_reaches_backend() {
        let api = Arc::new(ScriptedExchange::new());
        let svc = OrderService::new(api.clone());

        let mut req = request();
        req.amount = dec!(0);
        assert!(matches!(
            svc.create_order(req).await,
            Err(BridgeError::Validation(_))
        ));

        let mut req = request();
        req.destination_address = "  ".into();
        let err = svc.create_order(req).await.unwrap_err();
        assert_eq!(err.to_string(), "Destination address is required");

        let mut req = request();
        req.to_currency = "btc".into();
        assert!(svc.create_order(req).await.is_err());

        assert_eq!(api.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_rejection_surfaces_message() {
        let api = Arc::new(ScriptedExchange::new().with_create(Err(BridgeError::Rejected {
            code: 301,
            message: "Invalid address".into(),
        })));
        let svc = OrderService::new(api);
        let err = svc.create_order(request()).await.unwrap_err();
        assert!(err.to_string().contains("Invalid address"));
    }

    #[tokio::test]
    async fn test_catalog_capabilities_enforced() {
        let api = Arc::new(
            ScriptedExchange::new()
                .with_currencies(Ok(vec![raw_currency("BTC", 1, 1), raw_currency("ETH", 1, 0)]))
                .with_create(Ok(order_payload("FF-1", "NEW"))),
        );
        let catalog = Arc::new(CurrencyCatalog::new(api.clone(), 60));
        let svc = OrderService::with_catalog(api.clone(), catalog);

        let err = svc.create_order(request()).await.unwrap_err();
        assert_eq!(err, BridgeError::UnsupportedCurrency("ETH".into()));

        let mut req = request();
        req.to_currency = "DOGE".into();
        assert_eq!(
            svc.create_order(req).await.unwrap_err(),
            BridgeError::UnsupportedCurrency("DOGE".into())
        );
        assert_eq!(api.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_status() {
        let api = Arc::new(
            ScriptedExchange::new().with_create(Ok(order_payload("FF-1", "NEW"))),
        );
        api.push_status(Ok(order_payload("FF-1", "PENDING")));
        api.push_status(Err(BridgeError::Timeout));
        api.push_status(Ok(order_payload("FF-1", "BOGUS")));
        let svc = OrderService::new(api.clone());
        let order = svc.create_order(request()).await.unwrap();

        let snap = svc.check_status(&order).await.unwrap();
        assert_eq!(snap.status, OrderStatus::Waiting);
        assert!(svc.check_status(&order).await.is_none());
        assert!(svc.check_status(&order).await.is_none());
        assert_eq!(api.status_calls(), 3);
    }

    #[tokio::test]
    async fn test_load_order_by_token() {
        let api = Arc::new(ScriptedExchange::new());
        api.push_status(Ok(order_payload("FF-9", "EXCHANGE")));
        let svc = OrderService::new(api.clone());

        let order = svc.load_order("FF-9", "FF-9-token").await.unwrap();
        assert_eq!(order.order_id.as_str(), "FF-9");
        assert_eq!(order.current_status, OrderStatus::Processing);

        assert!(matches!(
            svc.load_order("FF-9", "").await,
            Err(BridgeError::Validation(_))
        ));
        assert_eq!(api.status_calls(), 1);
    }
}
