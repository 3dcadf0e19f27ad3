use crate::order::{OrderEvent, OrderKind, TimeInForce, id::OrderId, state::Cancelled};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xt_model::Side;

/// A strategy's request to open a new order, not yet accepted by the venue.
pub type OrderRequestOpen = OrderEvent<RequestOpen>;

/// A strategy's request to cancel an existing (or in-flight) order.
pub type OrderRequestCancel = OrderEvent<RequestCancel>;

/// Venue response to an [`OrderRequestCancel`] (spec §4.6 `cancelOrder`, §8 testable property 3:
/// idempotency of repeated cancellation).
pub type OrderResponseCancel = OrderEvent<Result<Cancelled, crate::error::ExchangeError>>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestOpen {
    pub side: Side,
    /// `None` for a market order priced in `quote_quantity`; `Some` otherwise. Futures venues
    /// transmit a literal price of `"0"` to denote market (spec §4.6).
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    /// Market-buy may instead be sized in quote currency (spec §4.6 order placement validation).
    pub quote_quantity: Option<Decimal>,
    pub kind: OrderKind,
    pub time_in_force: TimeInForce,
    pub stop_price: Option<Decimal>,
}

impl RequestOpen {
    pub fn limit(side: Side, price: Decimal, quantity: Decimal, time_in_force: TimeInForce) -> Self {
        Self {
            side,
            price: Some(price),
            quantity,
            quote_quantity: None,
            kind: OrderKind::Limit,
            time_in_force,
            stop_price: None,
        }
    }

    pub fn market_base(side: Side, quantity: Decimal) -> Self {
        Self {
            side,
            price: None,
            quantity,
            quote_quantity: None,
            kind: OrderKind::Market,
            time_in_force: TimeInForce::ImmediateOrCancel,
            stop_price: None,
        }
    }

    /// Market buy sized in quote currency (spec §4.6: "MARKET BUY: accept either baseQty or
    /// quoteQty").
    pub fn market_quote(side: Side, quote_quantity: Decimal) -> Self {
        Self {
            side,
            price: None,
            quantity: Decimal::ZERO,
            quote_quantity: Some(quote_quantity),
            kind: OrderKind::Market,
            time_in_force: TimeInForce::ImmediateOrCancel,
            stop_price: None,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Deserialize, Serialize)]
pub struct RequestCancel {
    pub id: Option<OrderId>,
}

impl RequestCancel {
    pub fn new(id: OrderId) -> Self {
        Self { id: Some(id) }
    }
}
