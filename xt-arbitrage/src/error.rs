use rust_decimal::Decimal;
use thiserror::Error;
use xt_model::exchange::ExchangeId;

/// Orchestration-level failures (spec §4.10, §7): distinct from [`xt_execution::error::ClientError`]
/// because a failed arbitrage action is never retried by the orchestrator itself - on any error it
/// cannot resolve within one monitoring tick it logs and transitions to `error_recovery` (spec §7
/// "User-visible failure behaviour").
#[derive(Debug, Clone, Error)]
pub enum ArbitrageError {
    #[error("venue call failed: {0}")]
    Client(#[from] xt_execution::error::ClientError),

    #[error("no spot venue quoted a fresh book ticker")]
    NoQuotes,

    #[error("{exchange} minimum quote quantity {min} exceeds proposed base quantity {proposed}")]
    BelowMinQuantity {
        exchange: ExchangeId,
        min: Decimal,
        proposed: Decimal,
    },

    #[error("switch opportunity observed at {observed_at} is stale")]
    StaleOpportunity { observed_at: chrono::DateTime<chrono::Utc> },

    #[error("delta imbalance {delta} detected immediately before executing a switch")]
    DeltaImbalanceDetected { delta: Decimal },

    #[error("placement of {leg} leg on {exchange} failed, compensating order(s) issued: {source}")]
    LegPlacementFailed {
        leg: &'static str,
        exchange: ExchangeId,
        #[source]
        source: xt_execution::error::ClientError,
    },

    #[error("no active spot position to act on")]
    NoActivePosition,

    #[error("unknown spot venue {0}")]
    UnknownSpotVenue(ExchangeId),
}

impl ArbitrageError {
    /// `true` when this failure is the kind the monitoring loop resolves by transitioning to
    /// `error_recovery` rather than propagating (spec §4.10, §7).
    pub fn triggers_error_recovery(&self) -> bool {
        match self {
            ArbitrageError::Client(error) => !error.is_retryable(),
            ArbitrageError::DeltaImbalanceDetected { .. } => false,
            _ => true,
        }
    }
}
