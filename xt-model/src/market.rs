use crate::symbol::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Best bid/ask snapshot. Never cached by this crate - every read must reflect the latest
/// WebSocket push or a fresh REST fetch (spec §3).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookTicker {
    pub symbol: Symbol,
    pub bid_price: Decimal,
    pub bid_qty: Decimal,
    pub ask_price: Decimal,
    pub ask_qty: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// A single `(price, size)` order book level.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Level {
    pub price: Decimal,
    pub size: Decimal,
}

/// An order book snapshot: bids sorted descending by price, asks ascending, with a monotonic
/// `timestamp`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderBook {
    pub symbol: Symbol,
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
    pub timestamp: DateTime<Utc>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<Level> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<Level> {
        self.asks.first().copied()
    }

    /// `true` if bids are strictly descending and asks strictly ascending by price.
    pub fn is_ordered(&self) -> bool {
        self.bids.windows(2).all(|w| w[0].price >= w[1].price)
            && self.asks.windows(2).all(|w| w[0].price <= w[1].price)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Kline {
    pub symbol: Symbol,
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: &str, size: &str) -> Level {
        Level {
            price: price.parse().unwrap(),
            size: size.parse().unwrap(),
        }
    }

    #[test]
    fn detects_ordering_violation() {
        let book = OrderBook {
            symbol: Symbol::new("BTC", "USDT"),
            bids: vec![level("100", "1"), level("101", "1")],
            asks: vec![level("102", "1"), level("103", "1")],
            timestamp: Utc::now(),
        };
        assert!(!book.is_ordered());
    }

    #[test]
    fn best_bid_ask_are_the_first_levels() {
        let book = OrderBook {
            symbol: Symbol::new("BTC", "USDT"),
            bids: vec![level("100", "1"), level("99", "2")],
            asks: vec![level("101", "1"), level("102", "2")],
            timestamp: Utc::now(),
        };
        assert_eq!(book.best_bid().unwrap().price, dec!(100));
        assert_eq!(book.best_ask().unwrap().price, dec!(101));
    }
}
