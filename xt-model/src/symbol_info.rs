use crate::symbol::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading-fee schedule for a symbol (or a venue's account-level fee applied to every symbol).
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Fees {
    pub maker: Decimal,
    pub taker: Decimal,
}

/// Static-ish per-symbol trading metadata. Refreshed on a TTL (default 5 minutes) and never
/// consulted on the hot path after caching - orders are validated locally against the cached
/// copy rather than round-tripping to the venue.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SymbolInfo {
    pub symbol: Symbol,
    pub base_precision: u32,
    pub quote_precision: u32,
    pub min_base_qty: Decimal,
    pub min_quote_qty: Decimal,
    pub tick_size: Decimal,
    pub step_size: Decimal,
    pub fees: Fees,
    pub is_futures: bool,
    pub trading_active: bool,
    pub refreshed_at: DateTime<Utc>,
}

impl SymbolInfo {
    pub const DEFAULT_TTL_SECS: i64 = 300;

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        (now - self.refreshed_at).num_seconds() >= Self::DEFAULT_TTL_SECS
    }

    /// Round `qty` down to this symbol's `step_size` grid.
    pub fn round_step(&self, qty: Decimal) -> Decimal {
        round_down_to_increment(qty, self.step_size)
    }

    /// Round `price` down to this symbol's `tick_size` grid.
    pub fn round_tick(&self, price: Decimal) -> Decimal {
        round_down_to_increment(price, self.tick_size)
    }
}

fn round_down_to_increment(value: Decimal, increment: Decimal) -> Decimal {
    if increment.is_zero() {
        return value;
    }
    (value / increment).trunc() * increment
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_down_to_step_grid() {
        let info = SymbolInfo {
            symbol: Symbol::new("BTC", "USDT"),
            base_precision: 6,
            quote_precision: 2,
            min_base_qty: dec!(0.0001),
            min_quote_qty: dec!(5),
            tick_size: dec!(0.01),
            step_size: dec!(0.001),
            fees: Fees { maker: dec!(0.001), taker: dec!(0.001) },
            is_futures: false,
            trading_active: true,
            refreshed_at: Utc::now(),
        };

        assert_eq!(info.round_step(dec!(1.23456)), dec!(1.234));
        assert_eq!(info.round_tick(dec!(100.127)), dec!(100.12));
    }

    #[test]
    fn staleness_uses_default_ttl() {
        let info = SymbolInfo {
            symbol: Symbol::new("BTC", "USDT"),
            base_precision: 6,
            quote_precision: 2,
            min_base_qty: dec!(0.0001),
            min_quote_qty: dec!(5),
            tick_size: dec!(0.01),
            step_size: dec!(0.001),
            fees: Fees { maker: dec!(0.001), taker: dec!(0.001) },
            is_futures: false,
            trading_active: true,
            refreshed_at: Utc::now() - chrono::Duration::seconds(301),
        };
        assert!(info.is_stale(Utc::now()));
    }
}
