//! Opportunity records (spec §3) produced by [`crate::orchestrator::find_best_spot_entry`] and
//! [`crate::orchestrator::evaluate_spot_switch`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use xt_model::exchange::ExchangeId;

/// A candidate spot venue to enter the spot leg on (spec §3, §4.10 `findBestSpotEntry`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotOpportunity {
    pub exchange: ExchangeId,
    pub entry_price: Decimal,
    /// `(spotAsk - futuresBid) / spotAsk * 100` (spec §4.10).
    pub cost_pct: Decimal,
    pub max_qty: Decimal,
}

/// A candidate migration of the spot leg from `current` to `target` without touching the hedge
/// (spec §3, §4.10 `evaluateSpotSwitch`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotSwitchOpportunity {
    pub current: ExchangeId,
    pub target: ExchangeId,
    pub current_exit_price: Decimal,
    pub target_entry_price: Decimal,
    /// `(currentBid - targetAsk) / currentBid * 100` (spec §4.10).
    pub profit_pct: Decimal,
    pub max_qty: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl SpotSwitchOpportunity {
    /// A switch opportunity is only actionable if observed within the most recent tick scan
    /// (spec §3 "Freshness", §8 testable property: stale opportunities rejected at execution
    /// time). `max_age` is the driver clock's tick period.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now.signed_duration_since(self.observed_at) <= max_age
    }
}
