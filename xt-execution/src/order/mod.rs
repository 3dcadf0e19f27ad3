use crate::order::{
    id::StrategyId,
    request::{OrderRequestCancel, OrderRequestOpen, RequestCancel, RequestOpen},
};
use derive_more::Constructor;
use id::ClientOrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use state::{ActiveOrderState, Cancelled, InactiveOrderState, Open, OpenInFlight, OrderState};
use xt_model::{Side, exchange::ExchangeId, symbol::Symbol};

pub use xt_model::order::{OrderKind, TimeInForce};

/// `Order` related identifiers.
pub mod id;

/// `Order` states.
///
/// eg/ `OpenInFlight`, `Open`, `Rejected`, `Expired`, etc.
pub mod state;

/// Order open and cancel request types.
///
/// ie/ `OrderRequestOpen` & `OrderRequestCancel`.
pub mod request;

#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
)]
pub struct OrderEvent<State> {
    pub key: OrderKey,
    pub state: State,
}

#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
)]
pub struct OrderKey {
    pub exchange: ExchangeId,
    pub symbol: Symbol,
    pub strategy: StrategyId,
    pub cid: ClientOrderId,
}

/// Locally-tracked order lifecycle record (spec §3 `Order` plus the optimistic
/// `OpenInFlight`/`CancelInFlight` states a caller observes between issuing a request and the
/// venue's REST confirmation - spec §5: cancelling a placement task never implies the order was
/// not accepted, so this record is reconciled against `getOpenOrders` on the orchestrator's next
/// tick rather than trusted in isolation).
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
)]
pub struct Order<State = OrderState> {
    pub key: OrderKey,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub kind: OrderKind,
    pub time_in_force: TimeInForce,
    pub state: State,
}

impl Order<OrderState> {
    pub fn to_active(&self) -> Option<Order<ActiveOrderState>> {
        let OrderState::Active(state) = &self.state else {
            return None;
        };

        Some(Order {
            key: self.key.clone(),
            side: self.side,
            price: self.price,
            quantity: self.quantity,
            kind: self.kind,
            time_in_force: self.time_in_force,
            state: state.clone(),
        })
    }

    pub fn to_inactive(&self) -> Option<Order<InactiveOrderState>> {
        let OrderState::Inactive(state) = &self.state else {
            return None;
        };

        Some(Order {
            key: self.key.clone(),
            side: self.side,
            price: self.price,
            quantity: self.quantity,
            kind: self.kind,
            time_in_force: self.time_in_force,
            state: state.clone(),
        })
    }

    /// `true` once the order has reached a sticky terminal status (spec §3 order lifecycle).
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, OrderState::Inactive(_))
    }
}

impl Order<ActiveOrderState> {
    pub fn to_request_cancel(&self) -> Option<OrderRequestCancel> {
        let Order { key, state, .. } = self;

        let request_cancel = match state {
            ActiveOrderState::OpenInFlight(_) => RequestCancel { id: None },
            ActiveOrderState::Open(open) => RequestCancel {
                id: Some(open.id.clone()),
            },
            _ => return None,
        };

        Some(OrderRequestCancel {
            key: key.clone(),
            state: request_cancel,
        })
    }
}

impl From<&OrderRequestOpen> for Order<ActiveOrderState> {
    fn from(value: &OrderRequestOpen) -> Self {
        let OrderEvent {
            key,
            state:
                RequestOpen {
                    side,
                    price,
                    quantity,
                    kind,
                    time_in_force,
                    ..
                },
        } = value;

        Self {
            key: key.clone(),
            side: *side,
            price: price.unwrap_or_default(),
            quantity: *quantity,
            kind: *kind,
            time_in_force: *time_in_force,
            state: ActiveOrderState::OpenInFlight(OpenInFlight),
        }
    }
}

impl From<Order<Open>> for Order<ActiveOrderState> {
    fn from(value: Order<Open>) -> Self {
        let Order {
            key,
            side,
            price,
            quantity,
            kind,
            time_in_force,
            state,
        } = value;

        Self {
            key,
            side,
            price,
            quantity,
            kind,
            time_in_force,
            state: ActiveOrderState::Open(state),
        }
    }
}

impl From<Order<Open>> for Order<OrderState> {
    fn from(value: Order<Open>) -> Self {
        let Order {
            key,
            side,
            price,
            quantity,
            kind,
            time_in_force,
            state,
        } = value;

        Self {
            key,
            side,
            price,
            quantity,
            kind,
            time_in_force,
            state: OrderState::Active(ActiveOrderState::Open(state)),
        }
    }
}

impl From<Order<Cancelled>> for Order<OrderState> {
    fn from(value: Order<Cancelled>) -> Self {
        let Order {
            key,
            side,
            price,
            quantity,
            kind,
            time_in_force,
            state,
        } = value;

        Self {
            key,
            side,
            price,
            quantity,
            kind,
            time_in_force,
            state: OrderState::Inactive(InactiveOrderState::Cancelled(state)),
        }
    }
}
