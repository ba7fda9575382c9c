use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::exchange::OrderType;

/// Where a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Exchange,
    /// Synthetic quote from the fixed rate table
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub from_currency: String,
    pub to_currency: String,
    pub order_type: OrderType,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    /// Units of `to_currency` per unit of `from_currency`, after fees
    pub rate: Decimal,
    pub usd_value: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub expires_at: DateTime<Utc>,
    pub source: QuoteSource,
    /// Limit warnings reported by the exchange (e.g. amount below minimum)
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Quote {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Amount is inside the exchange limits. A zero max means unbounded.
    pub fn within_limits(&self) -> bool {
        self.from_amount >= self.min_amount
            && (self.max_amount.is_zero() || self.from_amount <= self.max_amount)
    }
}
