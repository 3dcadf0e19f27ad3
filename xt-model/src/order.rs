use crate::{symbol::Symbol, Side};
use chrono::{DateTime, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order type as transmitted to a venue.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display)]
pub enum OrderKind {
    Market,
    Limit,
    /// Limit order that is rejected rather than matched immediately (Post-Only / POC).
    LimitMaker,
    StopLimit,
}

/// Time-in-force policy governing how long a resting limit order lives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display)]
pub enum TimeInForce {
    #[display("GTC")]
    GoodTillCancel,
    #[display("IOC")]
    ImmediateOrCancel,
    #[display("FOK")]
    FillOrKill,
    /// Post-Only - reject immediate-match executions.
    #[display("POC")]
    PostOnlyCancel,
}

/// Order lifecycle status. Terminal statuses (`Filled`, `Cancelled`, `Rejected`, `Expired`) are
/// sticky: once reached, an `Order` record never transitions further.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
    Expired,
}

impl OrderStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected | OrderStatus::Expired
        )
    }
}

/// A canonical order record, normalised from whatever wire shape the venue returns.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Order {
    pub order_id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub filled_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub status: OrderStatus,
    pub time_in_force: Option<TimeInForce>,
    pub timestamp: DateTime<Utc>,
}

impl Order {
    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::New | OrderStatus::PartiallyFilled)
    }
}
