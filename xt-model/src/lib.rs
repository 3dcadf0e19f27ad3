#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    rust_2018_idioms
)]
#![allow(clippy::too_many_arguments)]

//! # xt-model
//! Canonical, venue-agnostic data model shared by every layer of the unified exchange access
//! layer: symbols, order/trade/position/balance records, order books, fees and withdrawal
//! records. Per-venue adapters translate wire formats into these types at the boundary; no
//! strategy code above `xt-execution`/`xt-stream` should ever hold a venue-native string or
//! number format.

/// Exchange identity: [`exchange::ExchangeId`] tags each supported venue + market combination.
pub mod exchange;

/// Canonical `(base, quote)` [`symbol::Symbol`] and the [`symbol::SymbolMapper`] contract each
/// venue adapter implements to translate to/from its native wire format.
pub mod symbol;

/// [`symbol_info::SymbolInfo`] — precision, step/tick size, fee and trading-active metadata,
/// refreshed on a TTL.
pub mod symbol_info;

/// [`order::Order`], [`order::OrderStatus`], [`order::OrderKind`], [`order::TimeInForce`].
pub mod order;

/// [`trade::Trade`] — an immutable fill record.
pub mod trade;

/// [`position::Position`] — a futures position, unsigned size + explicit [`position::PositionSide`].
pub mod position;

/// [`balance::AssetBalance`].
pub mod balance;

/// [`market::BookTicker`], [`market::OrderBook`], [`market::Kline`].
pub mod market;

/// [`withdrawal::WithdrawalRequest`], [`withdrawal::WithdrawalResponse`], [`withdrawal::AssetNetworkInfo`].
pub mod withdrawal;

/// [`instrument::Keyed`], [`instrument::MarketDataInstrument`],
/// [`instrument::MarketDataInstrumentKind`], [`instrument::InstrumentNameExchange`] - generic
/// scaffolding types used to key `xt-stream`'s venue-agnostic WebSocket stream plumbing (spec
/// C9/C10).
pub mod instrument;

pub use balance::AssetBalance;
pub use exchange::ExchangeId;
pub use market::{BookTicker, Kline, OrderBook};
pub use order::{Order, OrderKind, OrderStatus, TimeInForce};
pub use position::{Position, PositionSide};
pub use symbol::Symbol;
pub use symbol_info::SymbolInfo;
pub use trade::Trade;
pub use withdrawal::{DepositAddress, DepositRecord, WithdrawalRequest, WithdrawalResponse};

/// Side of a trade, order, or position.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, serde::Deserialize, serde::Serialize)]
pub enum Side {
    #[serde(alias = "buy", alias = "BUY", alias = "b")]
    Buy,
    #[serde(alias = "sell", alias = "SELL", alias = "s")]
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}
