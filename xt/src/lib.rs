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

//! # xt
//! Unified low-latency multi-exchange crypto trading client core: canonical data model
//! ([`xt_model`]), REST execution pipeline ([`xt_execution`]), WebSocket market-data streaming
//! ([`xt_stream`]) and the multi-spot/futures delta-neutral arbitrage orchestrator
//! ([`xt_arbitrage`]), wired together behind one composite façade (spec C11, [`facade`]).
//!
//! This crate owns the parts every binary needs regardless of which library crate the actual work
//! happens in: [`logging`] turns on structured `tracing` output, [`config`] resolves the one
//! immutable [`config::CoreConfig`] a process starts from, and [`facade::CompositeFacade`] is the
//! only place a concrete venue client is bound to a live book-ticker cache and handed to the
//! orchestrator as a [`xt_arbitrage::venue::SpotVenueFacade`] / `FuturesVenueFacade` trait object.

/// `tracing-subscriber` initialisation (ambient stack addendum: "Logging").
pub mod logging;

/// Fully-resolved startup configuration, env-var credential resolution (ambient stack addendum:
/// "Configuration").
pub mod config;

/// The composite exchange façade binding a REST client to a live WS book-ticker cache (spec §4.9,
/// C11).
pub mod facade;

use rust_decimal::Decimal;
use std::sync::Arc;
use xt_arbitrage::{
    Orchestrator,
    venue::{FuturesVenueFacade, SpotVenueFacade},
};
use xt_execution::{
    gateio::{GateioFuturesClient, GateioFuturesConfig, GateioSpotClient, GateioSpotConfig},
    mexc::{MexcSpotClient, MexcSpotConfig},
    order::id::StrategyId,
};

pub use config::CoreConfig;

/// Error constructing the default three-venue [`Orchestrator`] from a [`CoreConfig`] (spec C8:
/// client construction can fail on a malformed HMAC key).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to construct {venue} REST client: {source}")]
    Client {
        venue: &'static str,
        #[source]
        source: xt_execution::error::ClientError,
    },
}

/// Construct the default orchestrator over MEXC spot, Gate.io spot and Gate.io USDT perpetuals -
/// the three venues spec §2 names - from a resolved [`CoreConfig`].
///
/// Each venue's REST client is wrapped in a [`facade::CompositeFacade`] but `initialize()` is left
/// for the caller: opening the WS session needs to know which symbols will be traded, which this
/// function (construction only, spec §4.9 step 1) does not.
pub fn build_default_orchestrator(
    config: &CoreConfig,
    delta_tolerance: Decimal,
    tick_period: chrono::Duration,
    strategy: StrategyId,
) -> Result<
    (
        Orchestrator,
        Arc<facade::CompositeFacade<MexcSpotClient>>,
        Arc<facade::CompositeFacade<GateioSpotClient>>,
        Arc<facade::CompositeFacade<GateioFuturesClient>>,
    ),
    BuildError,
> {
    let mexc_client = MexcSpotClient::new(MexcSpotConfig {
        api_key: config.mexc_spot.api_key.clone(),
        api_secret: config.mexc_spot.api_secret.clone(),
        max_concurrent_private: config.rest_pool.max_concurrent_private,
    })
    .map_err(|source| BuildError::Client { venue: "MEXC spot", source })?;

    let gateio_spot_client = GateioSpotClient::new(GateioSpotConfig {
        api_key: config.gateio_spot.api_key.clone(),
        api_secret: config.gateio_spot.api_secret.clone(),
        max_concurrent_private: config.rest_pool.max_concurrent_private,
    })
    .map_err(|source| BuildError::Client { venue: "Gate.io spot", source })?;

    let gateio_futures_client = GateioFuturesClient::new(GateioFuturesConfig {
        api_key: config.gateio_futures_usd.api_key.clone(),
        api_secret: config.gateio_futures_usd.api_secret.clone(),
        max_concurrent_private: config.rest_pool.max_concurrent_private,
    })
    .map_err(|source| BuildError::Client { venue: "Gate.io USDT perpetuals", source })?;

    let mexc_facade = Arc::new(facade::CompositeFacade::new(mexc_client));
    let gateio_spot_facade = Arc::new(facade::CompositeFacade::new(gateio_spot_client));
    let gateio_futures_facade = Arc::new(facade::CompositeFacade::new(gateio_futures_client));

    let spots: Vec<Arc<dyn SpotVenueFacade>> =
        vec![mexc_facade.clone(), gateio_spot_facade.clone()];
    let futures: Arc<dyn FuturesVenueFacade> = gateio_futures_facade.clone();

    let orchestrator =
        Orchestrator::new(spots, futures, tick_period, strategy).with_delta_tolerance(delta_tolerance);

    Ok((orchestrator, mexc_facade, gateio_spot_facade, gateio_futures_facade))
}
