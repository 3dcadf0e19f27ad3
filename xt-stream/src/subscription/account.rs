//! Private-channel event model and handler registry (spec §4.8): the channel registry's
//! `bind(channelKind, handler)` exposed for the Order/AssetBalance/Position push types a venue's
//! authenticated WebSocket channel can deliver, alongside `SubscriptionKind` for public market
//! data. Unlike [`Subscription`](super::Subscription), a private channel is authenticated once
//! per venue account rather than subscribed per instrument, so it is modelled separately rather
//! than forced into the `SubscriptionKind`/`Subscription<Exchange, Inst, Kind>` shape.

use xt_model::{AssetBalance, Order, Position};

/// Private (authenticated) channel kind a venue's listen-key WebSocket session can push.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum PrivateChannelKind {
    Order,
    AssetBalance,
    Position,
}

/// One normalised push received over a venue's private WebSocket channel.
#[derive(Clone, PartialEq, Debug)]
pub enum PrivateEvent {
    Order(Order),
    AssetBalance(AssetBalance),
    Position(Position),
}

impl PrivateEvent {
    pub fn kind(&self) -> PrivateChannelKind {
        match self {
            PrivateEvent::Order(_) => PrivateChannelKind::Order,
            PrivateEvent::AssetBalance(_) => PrivateChannelKind::AssetBalance,
            PrivateEvent::Position(_) => PrivateChannelKind::Position,
        }
    }
}

/// Registry of `bind(channelKind, handler)` callbacks (spec §4.8). Multiple handlers may be
/// bound to the same [`PrivateChannelKind`]; [`Self::dispatch`] invokes them in bind order.
#[derive(Default)]
pub struct PrivateChannelRegistry {
    handlers: Vec<(PrivateChannelKind, Box<dyn Fn(&PrivateEvent) + Send + Sync>)>,
}

impl std::fmt::Debug for PrivateChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateChannelRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl PrivateChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler for `kind`. Invocation order on [`Self::dispatch`] follows bind order.
    pub fn bind<F>(&mut self, kind: PrivateChannelKind, handler: F)
    where
        F: Fn(&PrivateEvent) + Send + Sync + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Invoke every handler bound to `event`'s [`PrivateChannelKind`], in bind order.
    pub fn dispatch(&self, event: &PrivateEvent) {
        let kind = event.kind();
        for (bound_kind, handler) in &self.handlers {
            if *bound_kind == kind {
                handler(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use xt_model::{OrderKind, OrderStatus, Side, symbol::Symbol};

    fn sample_order() -> Order {
        Order {
            order_id: "1".to_string(),
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
    fn dispatches_only_to_handlers_bound_to_the_matching_channel() {
        let mut registry = PrivateChannelRegistry::new();
        let order_calls = Arc::new(Mutex::new(0));
        let balance_calls = Arc::new(Mutex::new(0));

        {
            let order_calls = order_calls.clone();
            registry.bind(PrivateChannelKind::Order, move |_| *order_calls.lock() += 1);
        }
        {
            let balance_calls = balance_calls.clone();
            registry.bind(PrivateChannelKind::AssetBalance, move |_| {
                *balance_calls.lock() += 1
            });
        }

        registry.dispatch(&PrivateEvent::Order(sample_order()));

        assert_eq!(*order_calls.lock(), 1);
        assert_eq!(*balance_calls.lock(), 0);
    }

    #[test]
    fn invokes_multiple_handlers_bound_to_one_channel_in_bind_order() {
        let mut registry = PrivateChannelRegistry::new();
        let order_log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order_log = order_log.clone();
            registry.bind(PrivateChannelKind::Order, move |_| order_log.lock().push(tag));
        }

        registry.dispatch(&PrivateEvent::Order(sample_order()));

        assert_eq!(*order_log.lock(), vec!["first", "second", "third"]);
    }
}
