#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! # xt-execution
//! Per-venue REST execution adapters: request signing, rate limiting, error classification,
//! retrying, and the order lifecycle state machine shared across MEXC spot, Gate.io spot and
//! Gate.io futures (USDT- and BTC-settled).
//!
//! [`client::MarketDataClient`] / [`client::AccountClient`] / [`client::FuturesMarketDataClient`] /
//! [`client::FuturesAccountClient`] are the contracts each venue adapter implements; strategy code
//! above this crate talks to venues exclusively through them. [`order`] holds the local order
//! lifecycle record (spec §3/§4.6), and [`error`] the canonical error taxonomy (spec §4.2) every
//! venue's [`xt_core::protocol::http::HttpParser`] classifies into.

/// Per-venue authenticated/unauthenticated trading contracts (spec C8).
pub mod client;

/// Canonical error taxonomy and retryability matrix (spec C2, §4.2).
pub mod error;

/// Locally-tracked order lifecycle record and request/response types (spec §3, §4.6).
pub mod order;

/// MEXC spot adapter: authenticator, classifier, symbol mapper, REST bindings (spec §4.4/§4.6/§6).
pub mod mexc;

/// Gate.io spot and futures adapters sharing one authenticator/classifier family (spec §4.4/§4.6/§6).
pub mod gateio;

/// Retrying REST call driver sitting above [`xt_core::protocol::http::rest::client::RestClient`]
/// (spec C7, §4.5).
pub mod retry;

/// Rolling REST-latency window and HFT sub-50ms compliance counter (spec §4.5 item 6).
pub mod metrics;
