//! In-flight order tracking between the tick that placed an order and the tick that reconciles
//! it (spec §5: "cancellation of a placement task does not imply the order was not accepted; on
//! cancellation, the reconciliation phase on the next tick inspects open orders from the venue").

use xt_model::{exchange::ExchangeId, symbol::Symbol};
use xt_execution::order::id::OrderId;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Leg {
    Spot,
    Futures,
}

/// A placed order this context is still waiting to see reach a terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrder {
    pub exchange: ExchangeId,
    pub symbol: Symbol,
    pub order_id: OrderId,
    pub leg: Leg,
}

impl PendingOrder {
    pub fn new(exchange: ExchangeId, symbol: Symbol, order_id: OrderId, leg: Leg) -> Self {
        Self { exchange, symbol, order_id, leg }
    }
}
