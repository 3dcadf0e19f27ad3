//! [`ArbitrageTaskContext`] (spec §3): externally owned trading parameters the orchestrator
//! evolves via immutable updates (spec: "the core evolves it via immutable updates") rather than
//! mutating in place - every transition produces a new context the caller re-stores.

use crate::{pending::PendingOrder, state::MultiSpotPositionState};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use xt_model::symbol::Symbol;

/// `traditional` enters on best spot, holds, exits both legs at profit target or timeout.
/// `spot_switching` additionally re-evaluates migration opportunities while in position (spec
/// §4.10 "Modes").
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    Traditional,
    SpotSwitching,
}

/// Orchestrator state machine tag (spec §3, §4.10 "State machine").
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Initializing,
    Scanning,
    InPosition,
    Exiting,
    ErrorRecovery,
}

impl TaskState {
    /// Valid transitions per spec §4.10: `initializing -> scanning <-> in_position -> exiting ->
    /// scanning | error_recovery`. Any state may fall back to `error_recovery`.
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        match (self, next) {
            (_, ErrorRecovery) => true,
            (Initializing, Scanning) => true,
            (Scanning, InPosition) => true,
            (InPosition, Scanning) => true,
            (InPosition, Exiting) => true,
            (Exiting, Scanning) => true,
            (ErrorRecovery, Scanning) => true,
            _ => false,
        }
    }
}

/// Per-symbol trading parameters plus the embedded position ledger (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageTaskContext {
    pub symbol: Symbol,
    pub max_entry_cost_pct: Decimal,
    pub min_profit_pct: Decimal,
    pub max_hold_hours: Decimal,
    /// Single order size, denominated in quote currency (spec §3).
    pub order_size_quote: Decimal,
    pub position_start_time: Option<DateTime<Utc>>,
    pub cumulative_volume_quote: Decimal,
    pub state: TaskState,
    pub position: MultiSpotPositionState,
    pub mode: OperationMode,
    pub min_switch_profit_pct: Decimal,
    /// Orders placed but not yet confirmed terminal/open by a `getOrder` poll (spec §5).
    pub pending_orders: Vec<PendingOrder>,
}

impl ArbitrageTaskContext {
    pub fn new(
        symbol: Symbol,
        mode: OperationMode,
        order_size_quote: Decimal,
        max_entry_cost_pct: Decimal,
        min_profit_pct: Decimal,
        max_hold_hours: Decimal,
        min_switch_profit_pct: Decimal,
    ) -> Self {
        Self {
            symbol,
            max_entry_cost_pct,
            min_profit_pct,
            max_hold_hours,
            order_size_quote,
            position_start_time: None,
            cumulative_volume_quote: Decimal::ZERO,
            state: TaskState::Initializing,
            position: MultiSpotPositionState::empty(),
            mode,
            min_switch_profit_pct,
            pending_orders: Vec::new(),
        }
    }

    /// Transition to `next`, panicking in debug builds on an illegal transition (an orchestrator
    /// bug, not a runtime condition - spec §4.10's graph is exhaustive).
    pub fn transition(&mut self, next: TaskState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal orchestrator transition {:?} -> {next:?}",
            self.state
        );
        self.state = next;
    }

    pub fn record_fill(&mut self, now: DateTime<Utc>, notional_quote: Decimal) {
        if self.position_start_time.is_none() {
            self.position_start_time = Some(now);
        }
        self.cumulative_volume_quote += notional_quote;
    }

    pub fn clear_position_timing(&mut self) {
        self.position_start_time = None;
    }

    pub fn hours_in_position(&self, now: DateTime<Utc>) -> Option<Decimal> {
        self.position_start_time.map(|start| {
            let seconds = now.signed_duration_since(start).num_seconds().max(0);
            Decimal::from(seconds) / Decimal::from(3600)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_spec_graph() {
        assert!(TaskState::Initializing.can_transition_to(TaskState::Scanning));
        assert!(TaskState::Scanning.can_transition_to(TaskState::InPosition));
        assert!(TaskState::InPosition.can_transition_to(TaskState::Exiting));
        assert!(TaskState::Exiting.can_transition_to(TaskState::Scanning));
        assert!(!TaskState::Initializing.can_transition_to(TaskState::Exiting));
        assert!(TaskState::InPosition.can_transition_to(TaskState::ErrorRecovery));
    }
}
