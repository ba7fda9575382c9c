//! Fixed USD reference prices for offline quotes
//!
//! Stand-in data only. Not a pricing source.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;

static USD_PRICES: Lazy<HashMap<&'static str, Decimal>> = Lazy::new(|| {
    HashMap::from([
        ("BTC", Decimal::new(65_000, 0)),
        ("ETH", Decimal::new(3_500, 0)),
        ("USDT", Decimal::ONE),
        ("USDTTRC", Decimal::ONE),
        ("USDTERC", Decimal::ONE),
        ("USDC", Decimal::ONE),
        ("SOL", Decimal::new(150, 0)),
        ("LTC", Decimal::new(80, 0)),
        ("XMR", Decimal::new(160, 0)),
        ("TRX", Decimal::new(12, 2)),
        ("DOGE", Decimal::new(15, 2)),
    ])
});

/// Reference USD price for a currency code (case-insensitive)
pub fn usd_price(code: &str) -> Option<Decimal> {
    USD_PRICES.get(code.to_ascii_uppercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookup() {
        assert_eq!(usd_price("BTC"), Some(dec!(65000)));
        assert_eq!(usd_price("usdc"), Some(dec!(1)));
        assert_eq!(usd_price("DOGE"), Some(dec!(0.15)));
        assert_eq!(usd_price("NOPE"), None);
    }
}
