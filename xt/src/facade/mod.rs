//! The composite exchange façade (spec §4.9, C11): wires a concrete `xt-execution` REST client to
//! a live `OrderBooksL1` WS stream so the arbitrage orchestrator always reads the freshest book
//! ticker available, as required by spec §3's `BookTicker` invariant.

/// The live WS push cache, keyed by canonical [`xt_model::symbol::Symbol`].
pub mod cache;

/// `CompositeFacade<Client>`: binds a REST client to the cache and implements the orchestrator's
/// narrow façade traits.
pub mod composite;

/// `AccountMirror`: the order/balance/position state a private-mode façade keeps warm (spec §4.9
/// item 2).
pub mod mirror;

/// Per-venue background tasks that populate the cache from `OrderBooksL1` pushes.
pub mod stream;

pub use cache::BookTickerCache;
pub use composite::CompositeFacade;
pub use mirror::AccountMirror;
