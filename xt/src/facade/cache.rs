//! Live WS push cache backing [`super::composite::CompositeFacade::book_ticker`] (spec §3
//! `BookTicker`: "never cached ... must reflect the latest WS push or a fresh REST fetch" - a push
//! younger than [`BookTickerCache::MAX_AGE`] counts as "the latest WS push"; anything older is
//! treated as stale and the caller falls back to REST).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc, time::Duration};
use xt_model::{BookTicker, symbol::Symbol};

/// Shared, cheaply cloneable cache of the freshest [`BookTicker`] per [`Symbol`] observed over a
/// WebSocket `OrderBooksL1` subscription.
#[derive(Debug, Clone, Default)]
pub struct BookTickerCache {
    inner: Arc<RwLock<HashMap<Symbol, BookTicker>>>,
}

impl BookTickerCache {
    /// A push older than this is no longer "the latest WS push" (spec §3).
    pub const MAX_AGE: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, symbol: Symbol, ticker: BookTicker) {
        self.inner.write().insert(symbol, ticker);
    }

    /// The cached ticker for `symbol`, if present and younger than [`BookTickerCache::MAX_AGE`].
    pub fn get_fresh(&self, symbol: &Symbol, now: DateTime<Utc>) -> Option<BookTicker> {
        let guard = self.inner.read();
        let ticker = guard.get(symbol)?;
        let age = now.signed_duration_since(ticker.timestamp);
        (age >= chrono::Duration::zero() && age.to_std().ok()? <= Self::MAX_AGE).then(|| ticker.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ticker_at(ts: DateTime<Utc>) -> BookTicker {
        BookTicker {
            symbol: Symbol::new("BTC", "USDT"),
            bid_price: dec!(100),
            bid_qty: dec!(1),
            ask_price: dec!(100.1),
            ask_qty: dec!(1),
            timestamp: ts,
        }
    }

    #[test]
    fn fresh_push_is_returned() {
        let cache = BookTickerCache::new();
        let symbol = Symbol::new("BTC", "USDT");
        let now = Utc::now();
        cache.insert(symbol.clone(), ticker_at(now));

        assert!(cache.get_fresh(&symbol, now).is_some());
    }

    #[test]
    fn stale_push_is_rejected() {
        let cache = BookTickerCache::new();
        let symbol = Symbol::new("BTC", "USDT");
        let pushed_at = Utc::now();
        cache.insert(symbol.clone(), ticker_at(pushed_at));

        let later = pushed_at + chrono::Duration::seconds(10);
        assert!(cache.get_fresh(&symbol, later).is_none());
    }

    #[test]
    fn missing_symbol_is_none() {
        let cache = BookTickerCache::new();
        assert!(cache.get_fresh(&Symbol::new("ETH", "USDT"), Utc::now()).is_none());
    }
}
