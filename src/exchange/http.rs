//! HTTP client for the exchange backend
//!
//! Every call is a JSON `POST {base_url}/{method}` answered with the
//! `{code, msg, data}` envelope.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::BridgeError;
use super::types::{
    CreateRequest, Envelope, OrderPayload, PriceRequest, PriceResponse, RawCurrency,
    StatusRequest,
};
use super::ExchangeApi;
use crate::config::ExchangeConfig;

/// Longest error body kept in a [`BridgeError::Http`]
const MAX_ERROR_BODY: usize = 512;

pub struct HttpExchangeApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpExchangeApi {
    pub fn new(config: &ExchangeConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BridgeError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn call<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> Result<Value, BridgeError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "Exchange request");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let data = decode_response(status, &text);
        if let Err(e) = &data {
            warn!(method, status, code = e.code(), error = %e, "Exchange request failed");
        }
        data
    }
}

/// Map an HTTP status and body to the envelope payload
pub(crate) fn decode_response(status: u16, body: &str) -> Result<Value, BridgeError> {
    if status >= 400 {
        let mut body = body.to_string();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(BridgeError::Http { status, body });
    }

    let envelope: Envelope = serde_json::from_str(body)?;
    envelope.into_data()
}

#[async_trait]
impl ExchangeApi for HttpExchangeApi {
    async fn list_currencies(&self) -> Result<Vec<RawCurrency>, BridgeError> {
        let data = self.call("ccies", &serde_json::json!({})).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn quote(&self, req: &PriceRequest) -> Result<PriceResponse, BridgeError> {
        let data = self.call("price", req).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn create_order(&self, req: &CreateRequest) -> Result<OrderPayload, BridgeError> {
        let data = self.call("create", req).await?;
        OrderPayload::from_raw(data)
    }

    async fn check_status(&self, req: &StatusRequest) -> Result<OrderPayload, BridgeError> {
        let data = self.call("order", req).await?;
        OrderPayload::from_raw(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success() {
        let data = decode_response(200, r#"{"code":0,"msg":"OK","data":[1,2]}"#).unwrap();
        assert_eq!(data, json!([1, 2]));
    }

    #[test]
    fn test_decode_server_error_keeps_status() {
        let err = decode_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(
            err,
            BridgeError::Http {
                status: 502,
                body: "Bad Gateway".into()
            }
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_decode_client_error_not_retryable() {
        let err = decode_response(401, "{}").unwrap_err();
        assert!(matches!(err, BridgeError::Http { status: 401, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_truncates_long_body() {
        let body = "x".repeat(4096);
        match decode_response(500, &body).unwrap_err() {
            BridgeError::Http { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_response(200, "<html>").unwrap_err();
        assert!(matches!(err, BridgeError::Malformed(_)));
    }

    #[test]
    fn test_decode_rejection() {
        let err = decode_response(200, r#"{"code":311,"msg":"Amount too low"}"#).unwrap_err();
        assert_eq!(
            err,
            BridgeError::Rejected {
                code: 311,
                message: "Amount too low".into()
            }
        );
    }

    #[test]
    fn test_new_trims_base_url() {
        let api = HttpExchangeApi::new(&ExchangeConfig {
            base_url: "http://localhost:8080/api/v2/".into(),
            api_key: None,
            timeout_ms: 1000,
        })
        .unwrap();
        assert_eq!(api.base_url, "http://localhost:8080/api/v2");
    }
}
