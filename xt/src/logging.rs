//! Structured logging initialisation (ambient stack addendum: "Logging"). Every crate in this
//! workspace logs through `tracing`; this module is the one place a binary turns that on, mirroring
//! how the teacher repo's top-level crate owns its own `logging` module rather than leaving it to
//! each downstream consumer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise plain-text logging, reading `RUST_LOG` (default `info`) for filtering.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init()
}

/// Initialise JSON logging (one event per line), for environments that ingest structured logs.
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}
