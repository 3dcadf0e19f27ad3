//! The multi-spot / spot-futures arbitrage orchestrator (spec C12, §4.10): a state machine
//! maintaining delta-neutral exposure across N spot venues and one futures hedge.
//!
//! The pure decision functions ([`find_best_spot_entry`], [`evaluate_spot_switch`],
//! [`should_exit`]) take already-fetched [`BookTicker`] snapshots and never perform IO, so they
//! are exercised directly in tests (spec §8 E2E-5, E2E-6). [`Orchestrator`] is the imperative
//! shell that fetches those snapshots from the bound venue façades and drives order placement.

use crate::{
    context::{ArbitrageTaskContext, OperationMode, TaskState},
    error::ArbitrageError,
    opportunity::{SpotOpportunity, SpotSwitchOpportunity},
    pending::{Leg, PendingOrder},
    pnl,
    state::{FuturesLegPosition, SpotLegPosition, DEFAULT_DELTA_TOLERANCE, EMERGENCY_REBALANCE_MIN_USDT},
    venue::{FuturesVenueFacade, SpotVenueFacade},
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use xt_execution::order::{
    id::StrategyId,
    request::{OrderRequestOpen, RequestOpen},
    state::OrderState,
    OrderKey,
};
use xt_model::{BookTicker, Side, exchange::ExchangeId, position::PositionSide, symbol::Symbol};

/// `(spotAsk − futuresBid)/spotAsk · 100` for every spot venue with a fresh quote, the minimum of
/// which [`find_best_spot_entry`] selects (spec §4.10 `findBestSpotEntry`). Pure: takes
/// already-fetched tickers rather than performing IO, so it matches spec §8 E2E-5 exactly.
pub fn find_best_spot_entry(
    spot_tickers: &[(ExchangeId, BookTicker)],
    futures_ticker: &BookTicker,
    ctx: &ArbitrageTaskContext,
) -> Option<SpotOpportunity> {
    let order_size = ctx.order_size_quote;

    spot_tickers
        .iter()
        .filter_map(|(exchange, ticker)| {
            if ticker.ask_price.is_zero() {
                return None;
            }

            let cost_pct = (ticker.ask_price - futures_ticker.bid_price) / ticker.ask_price
                * Decimal::ONE_HUNDRED;

            let max_qty = ticker
                .ask_qty
                .min(futures_ticker.bid_qty)
                .min(order_size / ticker.ask_price);

            Some(SpotOpportunity {
                exchange: *exchange,
                entry_price: ticker.ask_price,
                cost_pct,
                max_qty,
            })
        })
        .min_by(|a, b| a.cost_pct.cmp(&b.cost_pct))
        .filter(|opportunity| opportunity.cost_pct < ctx.max_entry_cost_pct && opportunity.max_qty > Decimal::ZERO)
}

/// `(currentBid − targetAsk)/currentBid · 100` for every spot venue other than the active one,
/// the best of which [`evaluate_spot_switch`] selects if it clears `min_switch_profit_pct` (spec
/// §4.10 `evaluateSpotSwitch`, §8 E2E-6).
pub fn evaluate_spot_switch(
    spot_tickers: &[(ExchangeId, BookTicker)],
    ctx: &ArbitrageTaskContext,
    now: DateTime<Utc>,
) -> Option<SpotSwitchOpportunity> {
    let current = ctx.position.active_spot_exchange()?;
    let current_ticker = spot_tickers.iter().find(|(exchange, _)| *exchange == current)?.1.clone();

    if current_ticker.bid_price.is_zero() {
        return None;
    }

    let position = ctx.position.active_spot_position()?;

    spot_tickers
        .iter()
        .filter(|(exchange, _)| *exchange != current)
        .filter_map(|(exchange, ticker)| {
            if ticker.ask_price.is_zero() {
                return None;
            }

            let profit_pct = (current_ticker.bid_price - ticker.ask_price) / current_ticker.bid_price
                * Decimal::ONE_HUNDRED;

            Some(SpotSwitchOpportunity {
                current,
                target: *exchange,
                current_exit_price: current_ticker.bid_price,
                target_entry_price: ticker.ask_price,
                profit_pct,
                max_qty: position.qty.min(ticker.ask_qty),
                observed_at: now,
            })
        })
        .max_by(|a, b| a.profit_pct.cmp(&b.profit_pct))
        .filter(|switch| switch.profit_pct >= ctx.min_switch_profit_pct)
}

/// `true` once realised + unrealised P&L reaches `min_profit_pct`, or the position has been held
/// for `max_hold_hours` (spec §4.10 `shouldExit`).
pub fn should_exit(
    ctx: &ArbitrageTaskContext,
    spot_exit_price: Decimal,
    futures_exit_price: Decimal,
    total_fees: Decimal,
    now: DateTime<Utc>,
) -> bool {
    let (Some(spot), Some(futures)) = (
        ctx.position.active_spot_position(),
        ctx.position.futures_position(),
    ) else {
        return false;
    };

    let pnl_pct = pnl::round_trip_pnl_pct(spot, spot_exit_price, futures, futures_exit_price, total_fees);
    if pnl_pct >= ctx.min_profit_pct {
        return true;
    }

    ctx.hours_in_position(now)
        .is_some_and(|hours| hours >= ctx.max_hold_hours)
}

/// Binds the venue façades for one symbol's arbitrage task (spec §3 "Ownership": "the
/// orchestrator holds a back-reference to façades per venue").
pub struct Orchestrator {
    spots: Vec<Arc<dyn SpotVenueFacade>>,
    futures: Arc<dyn FuturesVenueFacade>,
    delta_tolerance: Decimal,
    /// Driver clock tick period, used to judge [`SpotSwitchOpportunity`] freshness (spec §3
    /// "Freshness").
    tick_period: ChronoDuration,
    strategy: StrategyId,
}

impl Orchestrator {
    pub fn new(
        spots: Vec<Arc<dyn SpotVenueFacade>>,
        futures: Arc<dyn FuturesVenueFacade>,
        tick_period: ChronoDuration,
        strategy: StrategyId,
    ) -> Self {
        Self {
            spots,
            futures,
            delta_tolerance: DEFAULT_DELTA_TOLERANCE,
            tick_period,
            strategy,
        }
    }

    /// Override the default delta tolerance (spec §3: "default 0.1%") with an operator-configured
    /// value.
    pub fn with_delta_tolerance(mut self, delta_tolerance: Decimal) -> Self {
        self.delta_tolerance = delta_tolerance;
        self
    }

    fn spot(&self, exchange: ExchangeId) -> Result<&Arc<dyn SpotVenueFacade>, ArbitrageError> {
        self.spots
            .iter()
            .find(|facade| facade.exchange() == exchange)
            .ok_or(ArbitrageError::UnknownSpotVenue(exchange))
    }

    async fn fetch_spot_tickers(&self, symbol: &Symbol) -> Vec<(ExchangeId, BookTicker)> {
        let mut out = Vec::with_capacity(self.spots.len());
        for facade in &self.spots {
            match facade.book_ticker(symbol).await {
                Ok(ticker) => out.push((facade.exchange(), ticker)),
                Err(error) => {
                    tracing::debug!(exchange = %facade.exchange(), %error, "skipping spot venue with no fresh quote");
                }
            }
        }
        out
    }

    /// One monitoring-loop tick (spec §4.10 "Monitoring loop"): reconcile pending orders, guard
    /// delta neutrality, then dispatch on `ctx.mode`. Consumes and returns `ctx` by value so the
    /// whole sequence of awaits is cancel-safe (spec §5) - the caller re-stores whatever is
    /// returned, even on an `Err`, since the context embedded in the error carries partial
    /// progress.
    pub async fn tick(
        &self,
        mut ctx: ArbitrageTaskContext,
        now: DateTime<Utc>,
    ) -> (ArbitrageTaskContext, Result<(), ArbitrageError>) {
        if let Err(error) = self.reconcile_pending_orders(&mut ctx).await {
            ctx.transition(TaskState::ErrorRecovery);
            return (ctx, Err(error));
        }

        if ctx.position.has_positions() && !ctx.position.is_delta_neutral(self.delta_tolerance) {
            if let Err(error) = self.emergency_rebalance(&mut ctx).await {
                ctx.transition(TaskState::ErrorRecovery);
                return (ctx, Err(error));
            }
        }

        let result = match ctx.mode {
            OperationMode::Traditional => self.tick_traditional(&mut ctx, now).await,
            OperationMode::SpotSwitching => self.tick_spot_switching(&mut ctx, now).await,
        };

        if let Err(error) = &result {
            if error.triggers_error_recovery() {
                ctx.transition(TaskState::ErrorRecovery);
            }
        }

        (ctx, result)
    }

    async fn tick_traditional(
        &self,
        ctx: &mut ArbitrageTaskContext,
        now: DateTime<Utc>,
    ) -> Result<(), ArbitrageError> {
        if !ctx.position.has_positions() {
            let tickers = self.fetch_spot_tickers(&ctx.symbol).await;
            let futures_ticker = self.futures.book_ticker(&ctx.symbol).await?;

            if let Some(opportunity) = find_best_spot_entry(&tickers, &futures_ticker, ctx) {
                self.enter_spot_futures_position(ctx, opportunity, now).await?;
            }
            return Ok(());
        }

        self.maybe_exit(ctx, now).await
    }

    async fn tick_spot_switching(
        &self,
        ctx: &mut ArbitrageTaskContext,
        now: DateTime<Utc>,
    ) -> Result<(), ArbitrageError> {
        if !ctx.position.has_positions() {
            return self.tick_traditional(ctx, now).await;
        }

        let tickers = self.fetch_spot_tickers(&ctx.symbol).await;
        if let Some(switch) = evaluate_spot_switch(&tickers, ctx, now) {
            return self.execute_spot_switch(ctx, switch).await;
        }

        self.maybe_exit(ctx, now).await
    }

    async fn maybe_exit(&self, ctx: &mut ArbitrageTaskContext, now: DateTime<Utc>) -> Result<(), ArbitrageError> {
        let Some(active) = ctx.position.active_spot_exchange() else {
            return Ok(());
        };
        let spot_ticker = self.spot(active)?.book_ticker(&ctx.symbol).await?;
        let futures_ticker = self.futures.book_ticker(&ctx.symbol).await?;

        if should_exit(ctx, spot_ticker.bid_price, futures_ticker.ask_price, Decimal::ZERO, now) {
            self.exit_all_positions(ctx).await?;
        }
        Ok(())
    }

    /// Spec §4.10 `enterSpotFuturesPosition`.
    pub async fn enter_spot_futures_position(
        &self,
        ctx: &mut ArbitrageTaskContext,
        opportunity: SpotOpportunity,
        now: DateTime<Utc>,
    ) -> Result<(), ArbitrageError> {
        let spot_facade = self.spot(opportunity.exchange)?.clone();

        let base_qty = (ctx.order_size_quote / opportunity.entry_price).min(opportunity.max_qty);

        let spot_info = spot_facade.symbol_info(&ctx.symbol).await?;
        let futures_info = self.futures.symbol_info(&ctx.symbol).await?;

        if base_qty < spot_info.min_base_qty {
            return Err(ArbitrageError::BelowMinQuantity {
                exchange: opportunity.exchange,
                min: spot_info.min_base_qty,
                proposed: base_qty,
            });
        }
        if base_qty < futures_info.min_base_qty {
            return Err(ArbitrageError::BelowMinQuantity {
                exchange: self.futures.exchange(),
                min: futures_info.min_base_qty,
                proposed: base_qty,
            });
        }

        // Round both legs to the stricter step size; if they differ, adjust both to the larger
        // to preserve strict neutrality (spec §4.10 step 3).
        let spot_rounded = spot_info.round_step(base_qty);
        let futures_rounded = futures_info.round_step(base_qty);
        let qty = spot_rounded.max(futures_rounded);

        let spot_key = self.order_key(opportunity.exchange, ctx.symbol.clone());
        let futures_key = self.order_key(self.futures.exchange(), ctx.symbol.clone());

        let spot_request = OrderRequestOpen::new(
            spot_key,
            RequestOpen::limit(Side::Buy, opportunity.entry_price, qty, xt_execution::order::TimeInForce::GoodTillCancel),
        );
        let futures_request = OrderRequestOpen::new(
            futures_key,
            RequestOpen::limit(
                Side::Sell,
                opportunity.entry_price,
                qty,
                xt_execution::order::TimeInForce::GoodTillCancel,
            ),
        );

        let (spot_result, futures_result) =
            tokio::join!(spot_facade.place_order(spot_request), self.futures.place_order(futures_request));

        match (spot_result, futures_result) {
            (Ok(spot_order), Ok(futures_order)) => {
                ctx.position.open(
                    opportunity.exchange,
                    SpotLegPosition { side: Side::Buy, qty, entry_price: opportunity.entry_price, opened_at: now },
                    FuturesLegPosition {
                        side: PositionSide::Short,
                        qty,
                        entry_price: opportunity.entry_price,
                        opened_at: now,
                    },
                );
                ctx.record_fill(now, qty * opportunity.entry_price);
                ctx.transition(TaskState::InPosition);

                if let Some(id) = spot_order.state.order_id() {
                    ctx.pending_orders.push(PendingOrder::new(opportunity.exchange, ctx.symbol.clone(), id, Leg::Spot));
                }
                if let Some(id) = futures_order.state.order_id() {
                    ctx.pending_orders.push(PendingOrder::new(self.futures.exchange(), ctx.symbol.clone(), id, Leg::Futures));
                }
                Ok(())
            }
            (spot_result, futures_result) => {
                // Cancel whichever leg(s) were placed (spec §4.10 step 5).
                if let Ok(order) = &spot_result {
                    self.cancel_spot_best_effort(&spot_facade, order).await;
                }
                if let Ok(order) = &futures_result {
                    self.cancel_futures_best_effort(order).await;
                }

                let failed = spot_result.err().or(futures_result.err()).expect("one leg failed");
                Err(ArbitrageError::LegPlacementFailed {
                    leg: "entry",
                    exchange: opportunity.exchange,
                    source: failed,
                })
            }
        }
    }

    /// Spec §4.10 `executeSpotSwitch`.
    pub async fn execute_spot_switch(
        &self,
        ctx: &mut ArbitrageTaskContext,
        switch: SpotSwitchOpportunity,
    ) -> Result<(), ArbitrageError> {
        if !switch.is_fresh(Utc::now(), self.tick_period) {
            return Err(ArbitrageError::StaleOpportunity { observed_at: switch.observed_at });
        }

        if !ctx.position.is_delta_neutral(self.delta_tolerance) {
            let delta = ctx.position.delta();
            self.emergency_rebalance(ctx).await?;
            return Err(ArbitrageError::DeltaImbalanceDetected { delta });
        }

        let current_position = ctx
            .position
            .spot_position(switch.current)
            .copied()
            .ok_or(ArbitrageError::NoActivePosition)?;

        let current_facade = self.spot(switch.current)?.clone();
        let target_facade = self.spot(switch.target)?.clone();

        let close_request = OrderRequestOpen::new(
            self.order_key(switch.current, ctx.symbol.clone()),
            RequestOpen::limit(
                current_position.side.opposite(),
                switch.current_exit_price,
                switch.max_qty,
                xt_execution::order::TimeInForce::GoodTillCancel,
            ),
        );
        let open_request = OrderRequestOpen::new(
            self.order_key(switch.target, ctx.symbol.clone()),
            RequestOpen::limit(
                current_position.side,
                switch.target_entry_price,
                switch.max_qty,
                xt_execution::order::TimeInForce::GoodTillCancel,
            ),
        );

        let (close_result, open_result) =
            tokio::join!(current_facade.place_order(close_request), target_facade.place_order(open_request));

        match (close_result, open_result) {
            (Ok(_), Ok(_)) => {
                ctx.position.migrate_spot(
                    switch.current,
                    SpotLegPosition {
                        side: current_position.side,
                        qty: switch.max_qty,
                        entry_price: switch.target_entry_price,
                        opened_at: Utc::now(),
                    },
                    switch.target,
                );

                if !ctx.position.is_delta_neutral(self.delta_tolerance) {
                    self.emergency_rebalance(ctx).await?;
                }
                Ok(())
            }
            (close_result, open_result) => {
                if let Ok(order) = &close_result {
                    self.cancel_spot_best_effort(&current_facade, order).await;
                }
                if let Ok(order) = &open_result {
                    self.cancel_spot_best_effort(&target_facade, order).await;
                }
                self.emergency_rebalance(ctx).await?;

                let failed = close_result.err().or(open_result.err()).expect("one leg failed");
                Err(ArbitrageError::LegPlacementFailed { leg: "switch", exchange: switch.target, source: failed })
            }
        }
    }

    /// Spec §4.10 `emergencyRebalance`: only acts once `|deltaUsdt| >= 5`; places a single
    /// futures order sized at `|delta|` in the direction that cancels the imbalance, and does not
    /// retry indefinitely - failure is logged and returned, not retried in a loop.
    pub async fn emergency_rebalance(&self, ctx: &mut ArbitrageTaskContext) -> Result<(), ArbitrageError> {
        let delta = ctx.position.delta();
        let futures_ticker = self.futures.book_ticker(&ctx.symbol).await?;
        let delta_usdt = (delta * futures_ticker.bid_price).abs();

        if delta_usdt < EMERGENCY_REBALANCE_MIN_USDT {
            return Ok(());
        }

        let Some(futures) = ctx.position.futures_position().copied() else {
            return Ok(());
        };

        // Excess spot (delta > 0) means the hedge is short of the spot exposure: increase the
        // short. Excess short (delta < 0) means the hedge overshoots: reduce the short.
        let side = if delta > Decimal::ZERO { Side::Sell } else { Side::Buy };
        let qty = delta.abs();

        let request = OrderRequestOpen::new(
            self.order_key(self.futures.exchange(), ctx.symbol.clone()),
            RequestOpen::market_base(side, qty),
        );

        match self.futures.place_order(request).await {
            Ok(_) => {
                let new_qty = if delta > Decimal::ZERO { futures.qty + qty } else { (futures.qty - qty).max(Decimal::ZERO) };
                ctx.position.adjust_futures_qty(new_qty);
                tracing::warn!(%delta, %delta_usdt, "emergency rebalance executed");
                Ok(())
            }
            Err(error) => {
                tracing::error!(%delta, %delta_usdt, %error, "emergency rebalance failed, not retrying");
                Err(ArbitrageError::Client(error))
            }
        }
    }

    /// Spec §4.10 `exitAllPositions`: closes the active spot leg and futures leg concurrently,
    /// returning the net realised P&L of the round trip (spec §8 testable property 7).
    pub async fn exit_all_positions(&self, ctx: &mut ArbitrageTaskContext) -> Result<Decimal, ArbitrageError> {
        let active = ctx.position.active_spot_exchange().ok_or(ArbitrageError::NoActivePosition)?;
        let spot = ctx.position.spot_position(active).copied().ok_or(ArbitrageError::NoActivePosition)?;
        let futures = ctx.position.futures_position().copied().ok_or(ArbitrageError::NoActivePosition)?;

        let spot_facade = self.spot(active)?.clone();
        let spot_ticker = spot_facade.book_ticker(&ctx.symbol).await?;
        let futures_ticker = self.futures.book_ticker(&ctx.symbol).await?;

        let spot_exit_price = spot_ticker.bid_price;
        let futures_exit_price = futures_ticker.ask_price;

        let close_spot = OrderRequestOpen::new(
            self.order_key(active, ctx.symbol.clone()),
            RequestOpen::market_base(spot.side.opposite(), spot.qty),
        );
        let close_futures_side = match futures.side {
            PositionSide::Long => Side::Sell,
            PositionSide::Short => Side::Buy,
        };
        let close_futures = OrderRequestOpen::new(
            self.order_key(self.futures.exchange(), ctx.symbol.clone()),
            RequestOpen::market_base(close_futures_side, futures.qty),
        );

        let (spot_result, futures_result) =
            tokio::join!(spot_facade.place_order(close_spot), self.futures.place_order(close_futures));

        spot_result.map_err(ArbitrageError::Client)?;
        futures_result.map_err(ArbitrageError::Client)?;

        let pnl = pnl::round_trip_pnl(&spot, spot_exit_price, &futures, futures_exit_price, Decimal::ZERO);

        ctx.position.clear();
        ctx.clear_position_timing();
        ctx.transition(TaskState::Scanning);

        Ok(pnl)
    }

    /// Compensating cancel for a leg that was placed while its sibling leg failed (spec §4.10
    /// step 5). Failure here is logged, not propagated - `reconcile_pending_orders` catches
    /// anything left dangling on the next tick (spec §5).
    async fn cancel_spot_best_effort(
        &self,
        facade: &Arc<dyn SpotVenueFacade>,
        order: &xt_execution::order::Order<xt_execution::order::state::ActiveOrderState>,
    ) {
        let Some(request) = order.to_request_cancel() else {
            return;
        };
        if let Err(error) = facade.cancel_order(request).await {
            tracing::warn!(exchange = %facade.exchange(), %error, "compensating cancel failed");
        }
    }

    async fn cancel_futures_best_effort(
        &self,
        order: &xt_execution::order::Order<xt_execution::order::state::ActiveOrderState>,
    ) {
        let Some(request) = order.to_request_cancel() else {
            return;
        };
        if let Err(error) = self.futures.cancel_order(request).await {
            tracing::warn!(exchange = %self.futures.exchange(), %error, "compensating cancel failed");
        }
    }

    fn order_key(&self, exchange: ExchangeId, symbol: Symbol) -> OrderKey {
        OrderKey::new(exchange, symbol, self.strategy.clone(), xt_execution::order::id::ClientOrderId::random())
    }

    /// Spec §4.10 "Monitoring loop" step 1: poll order status for any order still tracked as
    /// pending and apply terminal transitions. Orders that are still active are left pending.
    async fn reconcile_pending_orders(&self, ctx: &mut ArbitrageTaskContext) -> Result<(), ArbitrageError> {
        if ctx.pending_orders.is_empty() {
            return Ok(());
        }

        let mut still_pending = Vec::with_capacity(ctx.pending_orders.len());
        for pending in ctx.pending_orders.drain(..) {
            let order = match pending.leg {
                Leg::Spot => self.spot(pending.exchange)?.get_order(&pending.symbol, &pending.order_id).await,
                Leg::Futures => self.futures.get_order(&pending.symbol, &pending.order_id).await,
            };

            match order {
                Ok(order) if matches!(order.state, OrderState::Active(_)) => still_pending.push(pending),
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(exchange = %pending.exchange, %error, "order reconciliation poll failed, will retry next tick");
                    still_pending.push(pending);
                }
            }
        }

        ctx.pending_orders = still_pending;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ArbitrageTaskContext;
    use rust_decimal_macros::dec;

    fn ticker(exchange: ExchangeId, bid: Decimal, bid_qty: Decimal, ask: Decimal, ask_qty: Decimal) -> (ExchangeId, BookTicker) {
        (
            exchange,
            BookTicker {
                symbol: Symbol::new("BTC", "USDT"),
                bid_price: bid,
                bid_qty,
                ask_price: ask,
                ask_qty,
                timestamp: Utc::now(),
            },
        )
    }

    fn base_ctx(max_entry_cost_pct: Decimal) -> ArbitrageTaskContext {
        ArbitrageTaskContext::new(
            Symbol::new("BTC", "USDT"),
            OperationMode::Traditional,
            dec!(1000),
            max_entry_cost_pct,
            dec!(0.2),
            dec!(4),
            dec!(0.1),
        )
    }

    #[test]
    fn find_best_spot_entry_matches_e2e_5() {
        let tickers = vec![
            ticker(ExchangeId::MexcSpot, dec!(99.9), dec!(10), dec!(100.00), dec!(10)),
            ticker(ExchangeId::GateioSpot, dec!(99.8), dec!(10), dec!(99.90), dec!(10)),
        ];
        let futures = BookTicker {
            symbol: Symbol::new("BTC", "USDT"),
            bid_price: dec!(100.50),
            bid_qty: dec!(10),
            ask_price: dec!(100.55),
            ask_qty: dec!(10),
            timestamp: Utc::now(),
        };
        let ctx = base_ctx(dec!(0));

        let opportunity = find_best_spot_entry(&tickers, &futures, &ctx).expect("opportunity expected");

        assert_eq!(opportunity.exchange, ExchangeId::GateioSpot);
        assert_eq!(opportunity.entry_price, dec!(99.90));
        let expected_cost_pct = (dec!(99.90) - dec!(100.50)) / dec!(99.90) * dec!(100);
        assert_eq!(opportunity.cost_pct, expected_cost_pct);
    }

    #[test]
    fn find_best_spot_entry_rejects_when_above_max_cost() {
        let tickers = vec![ticker(ExchangeId::GateioSpot, dec!(99.8), dec!(10), dec!(105.00), dec!(10))];
        let futures = BookTicker {
            symbol: Symbol::new("BTC", "USDT"),
            bid_price: dec!(100.0),
            bid_qty: dec!(10),
            ask_price: dec!(100.1),
            ask_qty: dec!(10),
            timestamp: Utc::now(),
        };
        let ctx = base_ctx(dec!(0));

        assert!(find_best_spot_entry(&tickers, &futures, &ctx).is_none());
    }

    #[test]
    fn evaluate_spot_switch_matches_e2e_6() {
        let mut ctx = base_ctx(dec!(1));
        ctx.position.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100.00), opened_at: Utc::now() },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(1.0), entry_price: dec!(100.50), opened_at: Utc::now() },
        );
        ctx.min_switch_profit_pct = dec!(0.1);

        let tickers = vec![
            ticker(ExchangeId::GateioSpot, dec!(100.20), dec!(1), dec!(100.25), dec!(1)),
            ticker(ExchangeId::MexcSpot, dec!(100.00), dec!(1), dec!(100.05), dec!(1)),
        ];

        let now = Utc::now();
        let switch = evaluate_spot_switch(&tickers, &ctx, now).expect("switch opportunity expected");

        assert_eq!(switch.target, ExchangeId::MexcSpot);
        let expected_profit_pct = (dec!(100.20) - dec!(100.05)) / dec!(100.20) * dec!(100);
        assert_eq!(switch.profit_pct, expected_profit_pct);
    }

    #[test]
    fn evaluate_spot_switch_rejects_below_threshold() {
        let mut ctx = base_ctx(dec!(1));
        ctx.position.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100.00), opened_at: Utc::now() },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(1.0), entry_price: dec!(100.50), opened_at: Utc::now() },
        );
        ctx.min_switch_profit_pct = dec!(5);

        let tickers = vec![
            ticker(ExchangeId::GateioSpot, dec!(100.20), dec!(1), dec!(100.25), dec!(1)),
            ticker(ExchangeId::MexcSpot, dec!(100.00), dec!(1), dec!(100.05), dec!(1)),
        ];

        assert!(evaluate_spot_switch(&tickers, &ctx, Utc::now()).is_none());
    }

    #[test]
    fn should_exit_on_profit_target() {
        let mut ctx = base_ctx(dec!(1));
        ctx.position.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100.00), opened_at: Utc::now() },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(1.0), entry_price: dec!(100.50), opened_at: Utc::now() },
        );
        ctx.min_profit_pct = dec!(0.1);

        assert!(should_exit(&ctx, dec!(100.30), dec!(100.20), Decimal::ZERO, Utc::now()));
    }

    #[test]
    fn should_exit_on_max_hold_hours() {
        let mut ctx = base_ctx(dec!(1));
        let start = Utc::now() - ChronoDuration::hours(5);
        ctx.position.open(
            ExchangeId::GateioSpot,
            SpotLegPosition { side: Side::Buy, qty: dec!(1.0), entry_price: dec!(100.00), opened_at: start },
            FuturesLegPosition { side: PositionSide::Short, qty: dec!(1.0), entry_price: dec!(100.50), opened_at: start },
        );
        ctx.position_start_time = Some(start);
        ctx.min_profit_pct = dec!(50);
        ctx.max_hold_hours = dec!(4);

        assert!(should_exit(&ctx, dec!(100.00), dec!(100.50), Decimal::ZERO, Utc::now()));
    }
}
