//! Exchange backend error types

use thiserror::Error;

/// Errors surfaced by the exchange backend and the order services built on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    // === Validation Errors ===
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    // === Transport Errors ===
    #[error("Exchange request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Exchange returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // === Payload Errors ===
    #[error("Exchange rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("Malformed exchange payload: {0}")]
    Malformed(String),
}

impl BridgeError {
    /// Get the error code for notifications and logs
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Validation(_) => "VALIDATION",
            BridgeError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            BridgeError::Timeout => "TIMEOUT",
            BridgeError::Network(_) => "NETWORK",
            BridgeError::Http { .. } => "HTTP",
            BridgeError::Rejected { .. } => "REJECTED",
            BridgeError::Malformed(_) => "MALFORMED",
        }
    }

    /// Transient failures worth another attempt on the next poll.
    /// Client errors (4xx) and validation failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            BridgeError::Timeout | BridgeError::Network(_) => true,
            BridgeError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BridgeError::Timeout
        } else if e.is_decode() {
            BridgeError::Malformed(e.to_string())
        } else {
            BridgeError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::Malformed(e.to_string())
    }
}
