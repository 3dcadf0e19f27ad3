//! Pure profit/loss arithmetic (spec §4.10 `shouldExit`, §8 testable property 7), kept free of
//! any venue IO so it can be exercised directly in tests without mocking a façade.

use crate::state::{FuturesLegPosition, SpotLegPosition};
use rust_decimal::Decimal;
use xt_model::{Side, position::PositionSide};

/// PnL of a spot leg closing at `exit_price`.
pub fn spot_leg_pnl(side: Side, entry_price: Decimal, exit_price: Decimal, qty: Decimal) -> Decimal {
    match side {
        Side::Buy => (exit_price - entry_price) * qty,
        Side::Sell => (entry_price - exit_price) * qty,
    }
}

/// PnL of a futures leg closing at `exit_price`.
pub fn futures_leg_pnl(
    side: PositionSide,
    entry_price: Decimal,
    exit_price: Decimal,
    qty: Decimal,
) -> Decimal {
    match side {
        PositionSide::Long => (exit_price - entry_price) * qty,
        PositionSide::Short => (entry_price - exit_price) * qty,
    }
}

/// Net realised P&L of a full round trip (spec §8 testable property 7): the sum of both legs'
/// PnL net of `total_fees`.
pub fn round_trip_pnl(
    spot: &SpotLegPosition,
    spot_exit_price: Decimal,
    futures: &FuturesLegPosition,
    futures_exit_price: Decimal,
    total_fees: Decimal,
) -> Decimal {
    spot_leg_pnl(spot.side, spot.entry_price, spot_exit_price, spot.qty)
        + futures_leg_pnl(futures.side, futures.entry_price, futures_exit_price, futures.qty)
        - total_fees
}

/// Net realised P&L as a percentage of the spot leg's entry notional.
pub fn round_trip_pnl_pct(
    spot: &SpotLegPosition,
    spot_exit_price: Decimal,
    futures: &FuturesLegPosition,
    futures_exit_price: Decimal,
    total_fees: Decimal,
) -> Decimal {
    let notional = spot.entry_price * spot.qty;
    if notional.is_zero() {
        return Decimal::ZERO;
    }
    round_trip_pnl(spot, spot_exit_price, futures, futures_exit_price, total_fees) / notional
        * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<chrono::Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn round_trip_pnl_matches_spec_formula() {
        // spec §8 testable property 7 worked example: long spot, short futures.
        let spot = SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100.00), opened_at: now() };
        let futures = FuturesLegPosition {
            side: PositionSide::Short,
            qty: dec!(1.0),
            entry_price: dec!(100.50),
            opened_at: now(),
        };

        let pnl = round_trip_pnl(&spot, dec!(100.20), &futures, dec!(100.05), dec!(0.10));
        // (100.20 - 100.00)*1 + (100.50 - 100.05)*1 - 0.10 = 0.20 + 0.45 - 0.10 = 0.55
        assert_eq!(pnl, dec!(0.55));
    }
}
