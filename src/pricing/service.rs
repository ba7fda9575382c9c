//! Price quotation service

use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use super::quote::{Quote, QuoteSource};
use super::rates::usd_price;
use crate::exchange::{ExchangeApi, OrderType, PriceRequest, PriceResponse};

/// Fallback fee: 1% fixed, 0.5% float
fn fallback_fee(order_type: OrderType) -> Decimal {
    match order_type {
        OrderType::Fixed => Decimal::new(1, 2),
        OrderType::Float => Decimal::new(5, 3),
    }
}

/// Fallback limits in USD
const FALLBACK_MIN_USD: i64 = 10;
const FALLBACK_MAX_USD: i64 = 100_000;

const AMOUNT_DP: u32 = 8;

/// Upper bound on quote lifetime
const MAX_QUOTE_TTL_SECS: u64 = 86_400;

fn quote_ttl(secs: u64) -> TimeDelta {
    let secs = secs.min(MAX_QUOTE_TTL_SECS) as i64;
    TimeDelta::try_seconds(secs).unwrap_or_else(TimeDelta::zero)
}

pub struct PriceService {
    api: Arc<dyn ExchangeApi>,
    quote_ttl: TimeDelta,
}

impl PriceService {
    pub fn new(api: Arc<dyn ExchangeApi>, quote_ttl_secs: u64) -> Self {
        Self {
            api,
            quote_ttl: quote_ttl(quote_ttl_secs),
        }
    }

    /// Quote `amount` of `from` into `to`.
    ///
    /// Returns `None` for invalid input. Exchange failures fall back to a
    /// deterministic quote from the fixed rate table.
    pub async fn quote(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        order_type: OrderType,
    ) -> Option<Quote> {
        if from.trim().is_empty() || to.trim().is_empty() || amount <= Decimal::ZERO {
            return None;
        }
        if from.eq_ignore_ascii_case(to) {
            return None;
        }

        let req = PriceRequest {
            from_ccy: from.to_string(),
            to_ccy: to.to_string(),
            amount,
            direction: "from",
            order_type,
        };

        match self.api.quote(&req).await {
            Ok(resp) => Some(self.from_exchange(resp, order_type)),
            Err(e) => {
                warn!(from, to, error = %e, "Exchange quote failed, using fallback rates");
                self.fallback(from, to, amount, order_type)
            }
        }
    }

    fn from_exchange(&self, resp: PriceResponse, order_type: OrderType) -> Quote {
        let rate = if !resp.from.rate.is_zero() {
            resp.from.rate
        } else {
            resp.to
                .amount
                .checked_div(resp.from.amount)
                .map(|r| r.round_dp(AMOUNT_DP))
                .unwrap_or(Decimal::ZERO)
        };

        if !resp.errors.is_empty() {
            debug!(errors = ?resp.errors, "Exchange quote carries warnings");
        }

        Quote {
            from_currency: resp.from.code,
            to_currency: resp.to.code,
            order_type,
            from_amount: resp.from.amount,
            to_amount: resp.to.amount,
            rate,
            usd_value: resp.from.usd,
            min_amount: resp.from.min,
            max_amount: resp.from.max,
            expires_at: Utc::now() + self.quote_ttl,
            source: QuoteSource::Exchange,
            warnings: resp.errors,
        }
    }

    /// Deterministic quote from the rate table. `None` when either side is
    /// not in the table or the amount is too large to price.
    pub fn fallback(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        order_type: OrderType,
    ) -> Option<Quote> {
        let from_usd = usd_price(from)?;
        let to_usd = usd_price(to)?;
        if amount <= Decimal::ZERO {
            return None;
        }

        let net = Decimal::ONE - fallback_fee(order_type);
        let gross_usd = amount.checked_mul(from_usd)?;
        let rate = from_usd.checked_div(to_usd)?.checked_mul(net)?;
        let to_amount = gross_usd.checked_div(to_usd)?.checked_mul(net)?;

        Some(Quote {
            from_currency: from.to_ascii_uppercase(),
            to_currency: to.to_ascii_uppercase(),
            order_type,
            from_amount: amount,
            to_amount: to_amount.round_dp(AMOUNT_DP),
            rate: rate.round_dp(AMOUNT_DP),
            usd_value: gross_usd.round_dp(2),
            min_amount: (Decimal::from(FALLBACK_MIN_USD) / from_usd).round_dp(AMOUNT_DP),
            max_amount: (Decimal::from(FALLBACK_MAX_USD) / from_usd).round_dp(AMOUNT_DP),
            expires_at: Utc::now() + self.quote_ttl,
            source: QuoteSource::Fallback,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{BridgeError, ScriptedExchange};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn service(api: ScriptedExchange) -> PriceService {
        PriceService::new(Arc::new(api), 120)
    }

    #[tokio::test]
    async fn test_invalid_input_returns_none() {
        let svc = service(ScriptedExchange::new());
        assert!(svc.quote("", "ETH", dec!(1), OrderType::Float).await.is_none());
        assert!(svc.quote("BTC", " ", dec!(1), OrderType::Float).await.is_none());
        assert!(svc.quote("BTC", "ETH", dec!(0), OrderType::Float).await.is_none());
        assert!(svc.quote("BTC", "ETH", dec!(-1), OrderType::Float).await.is_none());
        assert!(svc.quote("BTC", "btc", dec!(1), OrderType::Float).await.is_none());
    }

    #[tokio::test]
    async fn test_exchange_quote() {
        let api = ScriptedExchange::new().with_price(Ok(json!({
            "from": {"code": "BTC", "amount": "0.5", "rate": "18.4", "usd": "32500", "min": "0.001", "max": "3"},
            "to": {"code": "ETH", "amount": "9.2", "usd": "32200"},
            "errors": []
        })));
        let quote = service(api)
            .quote("BTC", "ETH", dec!(0.5), OrderType::Fixed)
            .await
            .unwrap();

        assert_eq!(quote.source, QuoteSource::Exchange);
        assert_eq!(quote.to_amount, dec!(9.2));
        assert_eq!(quote.rate, dec!(18.4));
        assert_eq!(quote.usd_value, dec!(32500));
        assert!(quote.within_limits());
        assert!(!quote.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_exchange_quote_derives_missing_rate() {
        let api = ScriptedExchange::new().with_price(Ok(json!({
            "from": {"code": "USDC", "amount": "100"},
            "to": {"code": "USDTTRC", "amount": "99"},
            "errors": ["LIMIT_MIN"]
        })));
        let quote = service(api)
            .quote("USDC", "USDTTRC", dec!(100), OrderType::Float)
            .await
            .unwrap();
        assert_eq!(quote.rate, dec!(0.99));
        assert_eq!(quote.warnings, vec!["LIMIT_MIN".to_string()]);
    }

    #[tokio::test]
    async fn test_fallback_on_backend_failure() {
        let api = ScriptedExchange::new().with_price(Err(BridgeError::Http {
            status: 503,
            body: "unavailable".into(),
        }));
        let quote = service(api)
            .quote("BTC", "USDC", dec!(1), OrderType::Float)
            .await
            .unwrap();

        assert_eq!(quote.source, QuoteSource::Fallback);
        assert_eq!(quote.usd_value, dec!(65000));
        // 65000 * 0.995
        assert_eq!(quote.to_amount, dec!(64675));
        assert_eq!(quote.rate, dec!(64675));
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic() {
        let svc = service(ScriptedExchange::new());
        let a = svc.fallback("ETH", "BTC", dec!(2), OrderType::Fixed).unwrap();
        let b = svc.fallback("ETH", "BTC", dec!(2), OrderType::Fixed).unwrap();
        assert_eq!(a.to_amount, b.to_amount);
        assert_eq!(a.rate, b.rate);
        // 2 * 3500 / 65000 * 0.99
        assert_eq!(a.to_amount, dec!(0.10661538));
    }

    #[tokio::test]
    async fn test_fallback_unknown_currency() {
        let svc = service(ScriptedExchange::new());
        assert!(svc.quote("BTC", "NOPE", dec!(1), OrderType::Float).await.is_none());
    }

    #[tokio::test]
    async fn test_fallback_amount_too_large_to_price() {
        let api = ScriptedExchange::new().with_price(Err(BridgeError::Timeout));
        let svc = service(api);
        assert!(svc.quote("BTC", "ETH", Decimal::MAX, OrderType::Fixed).await.is_none());
        assert!(svc.fallback("BTC", "ETH", Decimal::MAX, OrderType::Float).is_none());
    }

    #[tokio::test]
    async fn test_exchange_quote_with_dust_amount_has_zero_rate() {
        let api = ScriptedExchange::new().with_price(Ok(json!({
            "from": {"code": "BTC", "amount": "0.0000000000000000000000000001"},
            "to": {"code": "ETH", "amount": "99"},
            "errors": []
        })));
        let quote = service(api)
            .quote("BTC", "ETH", dec!(1), OrderType::Float)
            .await
            .unwrap();
        assert_eq!(quote.rate, Decimal::ZERO);
    }

    #[test]
    fn test_quote_ttl_is_clamped() {
        assert_eq!(quote_ttl(120), TimeDelta::seconds(120));
        assert_eq!(quote_ttl(u64::MAX), TimeDelta::seconds(MAX_QUOTE_TTL_SECS as i64));

        let svc = PriceService::new(Arc::new(ScriptedExchange::new()), u64::MAX);
        let quote = svc.fallback("BTC", "ETH", dec!(1), OrderType::Float).unwrap();
        assert!(quote.expires_at <= Utc::now() + TimeDelta::days(1));
    }
}
