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

//! # xt-arbitrage
//! Multi-spot / spot-futures delta-neutral arbitrage orchestrator (spec C12): scans N spot
//! venues against one futures hedge for the cheapest entry, holds a delta-neutral position,
//! optionally migrates the spot leg to a cheaper venue mid-hold, and guards against drift with
//! an emergency rebalance.
//!
//! [`orchestrator::Orchestrator`] is the imperative shell; [`orchestrator::find_best_spot_entry`],
//! [`orchestrator::evaluate_spot_switch`] and [`orchestrator::should_exit`] are the pure decision
//! functions it calls, kept free of venue IO so they can be driven directly in tests (spec §8
//! E2E-5, E2E-6). [`venue`] defines the narrow façade traits the orchestrator depends on rather
//! than any concrete `xt-execution` client, so this crate never names a venue.

/// Opportunity records produced by the pure decision functions (spec §3).
pub mod opportunity;

/// The delta-neutral position ledger (spec §3).
pub mod state;

/// Per-symbol trading parameters and task state machine (spec §3, §4.10).
pub mod context;

/// In-flight order tracking between placement and reconciliation (spec §5).
pub mod pending;

/// Pure profit/loss arithmetic (spec §4.10, §8 testable property 7).
pub mod pnl;

/// Orchestration-level error taxonomy (spec §4.10, §7).
pub mod error;

/// Object-safe per-venue façade contracts and blanket `xt-execution` adapters (spec §3, C11/C12).
pub mod venue;

/// The orchestrator state machine and its pure decision functions (spec §4.10).
pub mod orchestrator;

pub use context::{ArbitrageTaskContext, OperationMode, TaskState};
pub use error::ArbitrageError;
pub use opportunity::{SpotOpportunity, SpotSwitchOpportunity};
pub use orchestrator::Orchestrator;
pub use state::MultiSpotPositionState;
pub use venue::{FuturesAdapter, FuturesVenueFacade, SpotAdapter, SpotVenueFacade};
