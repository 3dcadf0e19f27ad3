//! Internal position/balance mirrors a composite façade's private channel keeps warm (spec §4.9
//! item 2: `initialize` in private mode "bind[s] default handlers that populate internal
//! position/balance mirrors"). Mirrors every `PrivateEvent` from [`xt_stream`]'s listen-key
//! channel: mirrors the read/write split already used by [`super::cache::BookTickerCache`], keyed
//! by order id / asset / symbol instead of by symbol alone.

use parking_lot::RwLock;
use smol_str::SmolStr;
use std::{collections::HashMap, sync::Arc};
use xt_model::{AssetBalance, Order, Position, symbol::Symbol};

/// Shared, cheaply cloneable snapshot of the latest order/balance/position state pushed over a
/// venue's private WebSocket channel.
#[derive(Debug, Clone, Default)]
pub struct AccountMirror {
    orders: Arc<RwLock<HashMap<String, Order>>>,
    balances: Arc<RwLock<HashMap<SmolStr, AssetBalance>>>,
    positions: Arc<RwLock<HashMap<Symbol, Position>>>,
}

impl AccountMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_order(&self, order: Order) {
        self.orders.write().insert(order.order_id.clone(), order);
    }

    pub fn update_balance(&self, balance: AssetBalance) {
        self.balances.write().insert(balance.asset.clone(), balance);
    }

    pub fn update_position(&self, position: Position) {
        self.positions.write().insert(position.symbol.clone(), position);
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.orders.read().get(order_id).cloned()
    }

    pub fn balance(&self, asset: &str) -> Option<AssetBalance> {
        self.balances.read().get(asset).cloned()
    }

    pub fn position(&self, symbol: &Symbol) -> Option<Position> {
        self.positions.read().get(symbol).cloned()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    pub fn balances(&self) -> Vec<AssetBalance> {
        self.balances.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use xt_model::{OrderKind, OrderStatus, Side};

    fn sample_order(id: &str) -> Order {
        Order {
            order_id: id.to_string(),
            symbol: Symbol::new("BTC", "USDT"),
            side: Side::Buy,
            kind: OrderKind::Limit,
            quantity: dec!(1),
            price: Some(dec!(1)),
            filled_quantity: dec!(0),
            remaining_quantity: dec!(1),
            status: OrderStatus::New,
            time_in_force: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn update_order_replaces_the_previous_entry_for_the_same_id() {
        let mirror = AccountMirror::new();
        mirror.update_order(sample_order("1"));

        let mut updated = sample_order("1");
        updated.status = OrderStatus::Filled;
        mirror.update_order(updated);

        assert_eq!(mirror.order("1").unwrap().status, OrderStatus::Filled);
        assert_eq!(mirror.orders().len(), 1);
    }

    #[test]
    fn update_balance_is_keyed_by_asset() {
        let mirror = AccountMirror::new();
        mirror.update_balance(AssetBalance {
            asset: SmolStr::from("USDT"),
            available: dec!(100),
            locked: dec!(0),
        });

        assert_eq!(mirror.balance("USDT").unwrap().available, dec!(100));
        assert!(mirror.balance("BTC").is_none());
    }
}
