//! Currency catalog provider
//!
//! Fetches the tradable asset list from the exchange and keeps it in a TTL
//! cache. When the exchange is unreachable the built-in list is served so
//! that quoting and order forms keep working; the fallback is never cached.

use cached::{Cached, TimedCache};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::models::{Currency, fallback_currencies};
use crate::exchange::ExchangeApi;

pub struct CurrencyCatalog {
    api: Arc<dyn ExchangeApi>,
    cache: Mutex<TimedCache<(), Vec<Currency>>>,
}

impl CurrencyCatalog {
    pub fn new(api: Arc<dyn ExchangeApi>, ttl_secs: u64) -> Self {
        Self {
            api,
            cache: Mutex::new(TimedCache::with_lifespan(ttl_secs)),
        }
    }

    /// All catalog entries, including those with neither flag set
    pub async fn list(&self) -> Vec<Currency> {
        if let Some(cached) = self.cached() {
            return cached;
        }

        match self.api.list_currencies().await {
            Ok(raw) if !raw.is_empty() => {
                let currencies: Vec<Currency> = raw.into_iter().map(Currency::from).collect();
                debug!(count = currencies.len(), "Currency catalog refreshed");
                self.cache
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .cache_set((), currencies.clone());
                currencies
            }
            Ok(_) => {
                warn!("Exchange returned an empty currency list, using fallback catalog");
                fallback_currencies()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch currencies, using fallback catalog");
                fallback_currencies()
            }
        }
    }

    /// Entries usable on at least one side of a swap
    pub async fn available(&self) -> Vec<Currency> {
        self.list().await.into_iter().filter(|c| c.available()).collect()
    }

    /// Case-insensitive lookup by code
    pub async fn find(&self, code: &str) -> Option<Currency> {
        self.list()
            .await
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Drop the cached list so the next call refetches
    pub fn invalidate(&self) {
        self.cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .cache_clear();
    }

    fn cached(&self) -> Option<Vec<Currency>> {
        self.cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .cache_get(&())
            .cloned()
    }
}
