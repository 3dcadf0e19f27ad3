#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! # xt-core
//! Low-level framework for composing REST and WebSocket exchange integrations.
//!
//! ## Core abstractions
//! - [`protocol::http::rest::RestClient`] - configurable signed/unsigned HTTP communication.
//! - [`protocol::http::private::Signer`] + [`protocol::http::private::encoder::Encoder`] - the
//!   per-venue request signing pipeline.
//! - [`ratelimit::RateLimiter`] - per-endpoint and per-venue token buckets (spec C3).
//! - [`protocol::websocket`] - WebSocket connect/parse helpers shared by every venue session.

use crate::error::SocketError;
use serde::{Deserialize, Serialize};

/// All [`std::error::Error`]s generated in `xt-core`.
pub mod error;

/// HTTP (signed/unsigned REST) and WebSocket protocol plumbing.
pub mod protocol;

/// Request latency [`metric::Metric`] shape recorded by the REST transport.
pub mod metric;

/// Serde helper functions for decoding venue wire formats.
pub mod de;

/// Trait [`channel::Tx`] abstraction over different channel kinds.
pub mod channel;

/// Per-endpoint and per-venue token-bucket rate limiter (spec C3).
pub mod ratelimit;

/// [`subscription::SubscriptionId`] new type identifying a WebSocket data stream that has been
/// subscribed to (spec C10, channel registry).
pub mod subscription;

/// `fnv`-hashed [`collection::FnvIndexMap`]/[`collection::FnvIndexSet`] aliases.
pub mod collection;

/// Communication-protocol-agnostic [`stream::ExchangeStream`].
pub mod stream;

/// [`snapshot::Snapshot`] new type distinguishing a full state snapshot from an incremental
/// update.
pub mod snapshot;

/// [`Validator`]s are capable of determining if their internal state is satisfactory to fulfil
/// some use case defined by the implementor (e.g. a WebSocket subscription ack).
pub trait Validator {
    fn validate(self) -> Result<Self, SocketError>
    where
        Self: Sized;
}

/// [`Transformer`]s are capable of transforming any `Input` into an iterator of
/// `Result<Self::Output, Self::Error>`s (spec C10: per-venue channel registry transformers turn a
/// parsed WebSocket payload into zero or more canonical market/account events).
pub trait Transformer {
    type Error;
    type Input;
    type Output;
    type OutputIter: IntoIterator<Item = Result<Self::Output, Self::Error>>;

    fn transform(&mut self, input: Self::Input) -> Self::OutputIter;
}

/// Determines if something is considered "unrecoverable", such as an error that should tear down
/// a WebSocket session rather than trigger a reconnect.
pub trait Unrecoverable {
    fn is_unrecoverable(&self) -> bool;
}

/// Communicates if something is terminal (eg/ requires shutdown or restart).
pub trait Terminal {
    fn is_terminal(&self) -> bool;
}

/// Indicates an `Iterator` or `Stream` has ended.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize,
)]
pub struct FeedEnded;
