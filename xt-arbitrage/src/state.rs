//! [`MultiSpotPositionState`] (spec §3): the in-memory position ledger the orchestrator's event
//! loop exclusively mutates. Readers never see a half-updated state - every mutation replaces the
//! whole structure (spec §5 "Position-state mutations are performed only on the orchestrator
//! task. All other readers receive immutable snapshots").

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xt_model::{Side, exchange::ExchangeId, position::PositionSide};

/// Default tolerance for `|delta| / total_spot_qty` before the orchestrator routes to
/// `emergencyRebalance` (spec §3: "default 0.1%").
pub const DEFAULT_DELTA_TOLERANCE: Decimal = rust_decimal_macros::dec!(0.001);

/// Minimum USD delta imbalance before `emergencyRebalance` runs at all (spec §4.10).
pub const EMERGENCY_REBALANCE_MIN_USDT: Decimal = rust_decimal_macros::dec!(5);

/// One spot venue's leg of the delta-neutral position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpotLegPosition {
    pub side: Side,
    pub qty: Decimal,
    pub entry_price: Decimal,
    pub opened_at: DateTime<Utc>,
}

impl SpotLegPosition {
    pub fn is_flat(&self) -> bool {
        self.qty.is_zero()
    }
}

/// The single futures hedge leg.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FuturesLegPosition {
    pub side: PositionSide,
    pub qty: Decimal,
    pub entry_price: Decimal,
    pub opened_at: DateTime<Utc>,
}

impl FuturesLegPosition {
    pub fn is_flat(&self) -> bool {
        self.qty.is_zero()
    }
}

/// Mapping `spotExchangeKey -> spotPosition`, one `futuresPosition`, and an `activeSpotExchange`
/// pointer (spec §3). Invariants enforced by construction helpers, never by the caller directly:
///
/// - `|delta| / total_spot_qty <= deltaTolerance` whenever `has_positions()`.
/// - If any spot leg has `qty > 0`, `active_spot` names an exchange with `qty > 0`.
/// - `futures.side` is always opposite `active_spot_position().side` while `has_positions()`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MultiSpotPositionState {
    spots: indexmap::IndexMap<ExchangeId, SpotLegPosition>,
    futures: Option<FuturesLegPosition>,
    active_spot: Option<ExchangeId>,
}

impl MultiSpotPositionState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn active_spot_exchange(&self) -> Option<ExchangeId> {
        self.active_spot
    }

    pub fn spot_position(&self, exchange: ExchangeId) -> Option<&SpotLegPosition> {
        self.spots.get(&exchange)
    }

    pub fn active_spot_position(&self) -> Option<&SpotLegPosition> {
        self.active_spot.and_then(|exchange| self.spots.get(&exchange))
    }

    pub fn futures_position(&self) -> Option<&FuturesLegPosition> {
        self.futures.as_ref()
    }

    /// `true` once any spot leg or the futures leg carries a non-zero quantity.
    pub fn has_positions(&self) -> bool {
        self.futures.is_some_and(|futures| !futures.is_flat())
            || self.spots.values().any(|spot| !spot.is_flat())
    }

    /// `Σ spotQty` across every tracked spot venue.
    pub fn total_spot_qty(&self) -> Decimal {
        self.spots.values().map(|spot| spot.qty).sum()
    }

    /// `Σ spotQty - futuresQty` (spec §3 `delta`).
    pub fn delta(&self) -> Decimal {
        let futures_qty = self.futures.map(|f| f.qty).unwrap_or(Decimal::ZERO);
        self.total_spot_qty() - futures_qty
    }

    /// `true` if `|delta| / total_spot_qty <= tolerance`, vacuously `true` with no positions open
    /// (spec §8 testable property 4).
    pub fn is_delta_neutral(&self, tolerance: Decimal) -> bool {
        let total = self.total_spot_qty();
        if total.is_zero() {
            return true;
        }
        (self.delta() / total).abs() <= tolerance
    }

    /// Open (or replace) the active spot leg, the futures hedge, and mark `exchange` active.
    /// Establishes the invariant that `futures.side` is opposite `spot.side`.
    pub fn open(
        &mut self,
        exchange: ExchangeId,
        spot: SpotLegPosition,
        futures: FuturesLegPosition,
    ) {
        debug_assert_eq!(
            futures.side,
            match spot.side {
                Side::Buy => PositionSide::Short,
                Side::Sell => PositionSide::Long,
            },
            "futures leg must hedge the opposite direction of the spot leg"
        );

        self.spots.insert(exchange, spot);
        self.futures = Some(futures);
        self.active_spot = Some(exchange);
    }

    /// Retire the active spot leg on `from` and install a new one on `to`, preserving the
    /// futures leg untouched (spec §4.10 `executeSpotSwitch` step 4: "futures qty before and
    /// after is bit-equal" - §8 testable property 5).
    pub fn migrate_spot(&mut self, from: ExchangeId, to: SpotLegPosition, to_exchange: ExchangeId) {
        self.spots.shift_remove(&from);
        self.spots.insert(to_exchange, to);
        self.active_spot = Some(to_exchange);
    }

    /// Clear every leg after a successful `exitAllPositions` (spec §4.10).
    pub fn clear(&mut self) {
        self.spots.clear();
        self.futures = None;
        self.active_spot = None;
    }

    /// Replace the futures leg's quantity after an `emergencyRebalance` order (spec §4.10): the
    /// side never flips here, only the magnitude moves towards neutrality.
    pub fn adjust_futures_qty(&mut self, new_qty: Decimal) {
        if let Some(futures) = self.futures.as_mut() {
            futures.qty = new_qty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn delta_neutral_within_tolerance() {
        let mut state = MultiSpotPositionState::empty();
        state.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100), opened_at: now() },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(1.0005), entry_price: dec!(100.5), opened_at: now() },
        );

        assert!(state.is_delta_neutral(DEFAULT_DELTA_TOLERANCE));
    }

    #[test]
    fn delta_outside_tolerance_flags_imbalance() {
        let mut state = MultiSpotPositionState::empty();
        state.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100), opened_at: now() },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(0.9), entry_price: dec!(100.5), opened_at: now() },
        );

        assert!(!state.is_delta_neutral(DEFAULT_DELTA_TOLERANCE));
    }

    #[test]
    fn migrate_spot_preserves_futures_quantity_bit_equal() {
        let mut state = MultiSpotPositionState::empty();
        state.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100), opened_at: now() },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(1.0), entry_price: dec!(100.5), opened_at: now() },
        );
        let futures_before = *state.futures_position().unwrap();

        state.migrate_spot(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100.05), opened_at: now() },
            ExchangeId::MexcSpot,
        );

        assert_eq!(state.active_spot_exchange(), Some(ExchangeId::MexcSpot));
        assert!(state.spot_position(ExchangeId::GateioSpot).is_none());
        assert_eq!(*state.futures_position().unwrap(), futures_before);
    }

    #[test]
    fn empty_state_has_no_positions_and_is_vacuously_neutral() {
        let state = MultiSpotPositionState::empty();
        assert!(!state.has_positions());
        assert!(state.is_delta_neutral(DEFAULT_DELTA_TOLERANCE));
    }
}
