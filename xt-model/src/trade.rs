use crate::{symbol::Symbol, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable fill record, either from public trade tape or an account's own trade history.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Trade {
    pub trade_id: String,
    pub symbol: Symbol,
    pub price: Decimal,
    pub quantity: Decimal,
    pub side: Side,
    pub timestamp: DateTime<Utc>,
    pub is_maker: bool,
}

impl Trade {
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}
