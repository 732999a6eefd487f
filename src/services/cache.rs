// src/services/cache.rs
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{CachedFundamentals, Fundamentals, Market};

/// In-memory, session-scoped fundamentals store shared across request
/// handlers through an `Arc`. Expiry policy lives in the fetcher; the
/// store only records what was fetched and when.
pub struct CacheStore {
    entries: RwLock<HashMap<String, CachedFundamentals>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(market: Market, symbol: &str) -> String {
        format!("{}:{}", market.as_str(), symbol.to_ascii_uppercase())
    }

    pub async fn get(&self, market: Market, symbol: &str) -> Option<CachedFundamentals> {
        self.entries
            .read()
            .await
            .get(&Self::key(market, symbol))
            .cloned()
    }

    pub async fn update(&self, market: Market, symbol: &str, data: Fundamentals) {
        let entry = CachedFundamentals {
            data,
            fetched_at: Utc::now(),
        };
        self.entries
            .write()
            .await
            .insert(Self::key(market, symbol), entry);
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Fundamentals {
        Fundamentals {
            eps: 68.63,
            pe: 22.0,
            price: 1388.0,
            dividend_payout_ratio: 0.40,
        }
    }

    #[tokio::test]
    async fn empty_store_misses() {
        let store = CacheStore::new();
        assert!(store.get(Market::AShare, "600519").await.is_none());
    }

    #[tokio::test]
    async fn update_then_get_round_trips() {
        let store = CacheStore::new();
        store.update(Market::AShare, "600519", sample()).await;

        let entry = store.get(Market::AShare, "600519").await.unwrap();
        assert_eq!(entry.data.eps, 68.63);
        assert_eq!(entry.data.price, 1388.0);
    }

    #[tokio::test]
    async fn symbol_lookup_is_case_insensitive() {
        let store = CacheStore::new();
        store.update(Market::Us, "aapl", sample()).await;
        assert!(store.get(Market::Us, "AAPL").await.is_some());
    }

    #[tokio::test]
    async fn markets_do_not_collide() {
        let store = CacheStore::new();
        store.update(Market::AShare, "600519", sample()).await;
        assert!(store.get(Market::Us, "600519").await.is_none());
    }
}
