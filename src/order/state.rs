//! Order lifecycle states
//!
//! ```text
//! NEW → WAITING → PROCESSING → COMPLETED
//!          ↓           ↓
//!       EXPIRED      FAILED
//! ```
//!
//! Terminal: COMPLETED, EXPIRED, FAILED. An EXPIRED order may still be
//! recovered to COMPLETED by the reconciler when the store proves the
//! exchange finished it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::exchange::BridgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, no deposit seen yet
    New,
    /// Deposit detected, waiting for confirmations
    Waiting,
    /// Exchanging or sending to the destination
    Processing,
    /// Terminal: funds delivered
    Completed,
    /// Terminal: no deposit before the deadline
    Expired,
    /// Terminal: needs manual handling upstream
    Failed,
}

impl OrderStatus {
    /// Check if this is a terminal state (polling stops)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Expired | OrderStatus::Failed
        )
    }

    /// Map the exchange status vocabulary
    pub fn from_upstream(code: &str) -> Result<Self, BridgeError> {
        match code.to_ascii_uppercase().as_str() {
            "NEW" => Ok(OrderStatus::New),
            "PENDING" => Ok(OrderStatus::Waiting),
            "EXCHANGE" | "WITHDRAW" => Ok(OrderStatus::Processing),
            "DONE" => Ok(OrderStatus::Completed),
            "EXPIRED" => Ok(OrderStatus::Expired),
            "EMERGENCY" => Ok(OrderStatus::Failed),
            other => Err(BridgeError::Malformed(format!(
                "Unknown order status: {}",
                other
            ))),
        }
    }

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Waiting => "waiting",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Expired => "expired",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(OrderStatus::New),
            "waiting" => Some(OrderStatus::Waiting),
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            "expired" => Some(OrderStatus::Expired),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
