/// Public market-data endpoints: ping, time, exchangeInfo, depth, trades, klines, ticker (spec
/// §4.6 "Public spot", §6 literal MEXC paths).
pub mod public;

/// Authenticated trading/account endpoints: order placement/cancellation, balances, trades,
/// withdrawals, deposits, listen-key lifecycle (spec §4.6 "Private spot").
pub mod private;
