//! Currency catalog entries

use serde::{Deserialize, Serialize};

use crate::exchange::RawCurrency;

/// Tradable asset with its capability flags (0/1 as reported by the backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub network: String,
    pub color: String,
    pub send: u8,
    pub recv: u8,
}

impl Currency {
    pub fn new(code: &str, name: &str, network: &str, color: &str, send: u8, recv: u8) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            network: network.to_string(),
            color: color.to_string(),
            send,
            recv,
        }
    }

    /// Can be used as the source asset
    pub fn can_send(&self) -> bool {
        self.send != 0
    }

    /// Can be used as the destination asset
    pub fn can_receive(&self) -> bool {
        self.recv != 0
    }

    pub fn available(&self) -> bool {
        self.can_send() || self.can_receive()
    }
}

impl From<RawCurrency> for Currency {
    fn from(raw: RawCurrency) -> Self {
        let name = if raw.name.is_empty() {
            raw.coin.clone()
        } else {
            raw.name
        };
        Self {
            code: raw.code,
            name,
            network: raw.network,
            color: raw.color,
            send: raw.send,
            recv: raw.recv,
        }
    }
}

/// Built-in list served when the backend catalog cannot be fetched
pub fn fallback_currencies() -> Vec<Currency> {
    vec![
        Currency::new("BTC", "Bitcoin", "BTC", "#f7931a", 1, 1),
        Currency::new("ETH", "Ethereum", "ETH", "#627eea", 1, 1),
        Currency::new("USDTTRC", "Tether (TRC20)", "TRX", "#26a17b", 1, 1),
        Currency::new("USDTERC", "Tether (ERC20)", "ETH", "#26a17b", 1, 1),
        Currency::new("USDC", "USD Coin", "ETH", "#2775ca", 1, 1),
        Currency::new("SOL", "Solana", "SOL", "#9945ff", 1, 1),
        Currency::new("LTC", "Litecoin", "LTC", "#345d9d", 1, 1),
        Currency::new("XMR", "Monero", "XMR", "#ff6600", 1, 1),
        Currency::new("TRX", "Tron", "TRX", "#ef0027", 1, 1),
        Currency::new("DOGE", "Dogecoin", "DOGE", "#c2a633", 1, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_flags() {
        let both = Currency::new("BTC", "Bitcoin", "BTC", "", 1, 1);
        assert!(both.can_send() && both.can_receive() && both.available());

        let recv_only = Currency::new("XMR", "Monero", "XMR", "", 0, 1);
        assert!(!recv_only.can_send());
        assert!(recv_only.can_receive());
        assert!(recv_only.available());

        let disabled = Currency::new("OLD", "Delisted", "OLD", "", 0, 0);
        assert!(!disabled.available());
    }

    #[test]
    fn test_from_raw_falls_back_to_coin_name() {
        let raw = RawCurrency {
            code: "USDTTRC".into(),
            coin: "USDT".into(),
            network: "TRX".into(),
            name: String::new(),
            color: "#26a17b".into(),
            send: 1,
            recv: 0,
        };
        let currency = Currency::from(raw);
        assert_eq!(currency.name, "USDT");
        assert!(currency.can_send());
        assert!(!currency.can_receive());
    }

    #[test]
    fn test_fallback_list_is_usable() {
        let list = fallback_currencies();
        assert!(list.iter().all(|c| c.available()));
        assert!(list.iter().any(|c| c.code == "BTC"));
    }
}
