//! MEXC spot private WebSocket channel (spec §4.8): authenticated with a REST-issued listen key
//! rather than a per-request signature, pushing order and account-balance updates for the
//! account the listen key belongs to. Reuses the [`MexcPushData`] envelope the public channels
//! share (`c`/`s`/`t`/`d`), since MEXC wraps private pushes identically.
//!
//! This does not fit the [`Connector`](crate::exchange::Connector)/
//! [`StreamSelector`](crate::exchange::StreamSelector) framework: that framework subscribes to
//! channels per `Subscription<Exchange, Instrument, Kind>` (one instrument, one channel kind), but
//! a listen-key session is authenticated once per venue account and pushes every subscribed
//! instrument's private events over the same connection. [`spawn_private_stream`] instead drives
//! a hand-rolled reconnecting session built directly on [`init_reconnecting_stream`] and
//! [`xt_core::protocol::websocket::connect`].

use super::{BASE_URL_MEXC, trade::MexcPushData};
use crate::{
    error::DataError,
    streams::{
        consumer::{STREAM_RECONNECTION_POLICY, StreamKey},
        reconnect::{self, stream::{ReconnectingStream, init_reconnecting_stream}},
    },
    subscription::account::{PrivateChannelRegistry, PrivateEvent},
};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Deserialize;
use smol_str::SmolStr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, warn};
use xt_core::{
    error::SocketError,
    protocol::{StreamParser, websocket::WebSocketSerdeParser},
};
use xt_model::{
    AssetBalance, Order, OrderKind, OrderStatus, Side, exchange::ExchangeId, symbol::SymbolMapper,
};

/// Shared, updatable listen key. The façade's REST keep-alive task refreshes this in place;
/// [`spawn_private_stream`] reads the latest value on every (re)connect, so a listen-key
/// re-creation following a failed keep-alive is picked up without restarting the task.
#[derive(Debug, Clone)]
pub struct ListenKeyHandle(Arc<RwLock<String>>);

impl ListenKeyHandle {
    pub fn new(listen_key: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(listen_key.into())))
    }

    pub fn get(&self) -> String {
        self.0.read().clone()
    }

    pub fn set(&self, listen_key: impl Into<String>) {
        *self.0.write() = listen_key.into();
    }
}

/// MEXC private order update payload nested under `d` on the `spot@private.orders.v3.api`
/// channel.
#[derive(Clone, PartialEq, Debug, Deserialize)]
struct MexcPrivateOrder {
    #[serde(rename = "i")]
    order_id: String,
    #[serde(rename = "s")]
    symbol: String,
    /// `1` = buy, `2` = sell.
    #[serde(rename = "S")]
    side: i32,
    /// `1` = limit, `2` = market, `3` = limit-maker (post-only), `4` = stop-limit.
    #[serde(rename = "o")]
    order_type: i32,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "v")]
    quantity: String,
    #[serde(rename = "a")]
    deal_quantity: String,
    /// `1` = new, `2` = filled, `3` = partially filled, `4` = cancelled, `5` = partially
    /// cancelled (collapsed to `Cancelled`).
    #[serde(rename = "st")]
    status: i32,
    #[serde(rename = "ct")]
    create_time: i64,
}

/// MEXC private balance update payload nested under `d` on the `spot@private.account.v3.api`
/// channel.
#[derive(Clone, PartialEq, Debug, Deserialize)]
struct MexcPrivateBalance {
    #[serde(rename = "a")]
    asset: String,
    #[serde(rename = "f")]
    free: String,
    #[serde(rename = "l")]
    locked: String,
}

fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, SocketError> {
    raw.parse::<Decimal>().map_err(|error| SocketError::Unsupported {
        entity: "Mexc",
        item: format!("invalid {field} '{raw}': {error}"),
    })
}

fn ms_epoch_to_datetime(ms: i64) -> Result<DateTime<Utc>, SocketError> {
    if ms < 0 {
        return Err(SocketError::Unsupported {
            entity: "Mexc",
            item: format!("negative private push timestamp: {ms}"),
        });
    }
    DateTime::from_timestamp_millis(ms).ok_or_else(|| SocketError::Unsupported {
        entity: "Mexc",
        item: format!("invalid private push timestamp: {ms}"),
    })
}

fn decode_order(push: MexcPushData, symbols: &dyn SymbolMapper) -> Result<PrivateEvent, SocketError> {
    let data: MexcPrivateOrder = serde_json::from_value(push.data)
        .map_err(|error| SocketError::Deserialise { error, payload: push.channel })?;

    let symbol = symbols.to_symbol(&data.symbol).ok_or_else(|| SocketError::Unsupported {
        entity: "Mexc",
        item: format!("unmapped private order symbol: {}", data.symbol),
    })?;

    let side = match data.side {
        1 => Side::Buy,
        2 => Side::Sell,
        other => {
            return Err(SocketError::Unsupported {
                entity: "Mexc",
                item: format!("private order side code {other}"),
            });
        }
    };

    let kind = match data.order_type {
        1 => OrderKind::Limit,
        2 => OrderKind::Market,
        3 => OrderKind::LimitMaker,
        4 => OrderKind::StopLimit,
        other => {
            return Err(SocketError::Unsupported {
                entity: "Mexc",
                item: format!("private order type code {other}"),
            });
        }
    };

    let status = match data.status {
        1 => OrderStatus::New,
        2 => OrderStatus::Filled,
        3 => OrderStatus::PartiallyFilled,
        4 | 5 => OrderStatus::Cancelled,
        other => {
            return Err(SocketError::Unsupported {
                entity: "Mexc",
                item: format!("private order status code {other}"),
            });
        }
    };

    let quantity = parse_decimal(&data.quantity, "quantity")?;
    let price = parse_decimal(&data.price, "price")?;
    let filled_quantity = parse_decimal(&data.deal_quantity, "deal_quantity")?;
    let remaining_quantity = (quantity - filled_quantity).max(Decimal::ZERO);
    let timestamp = ms_epoch_to_datetime(data.create_time)?;

    Ok(PrivateEvent::Order(Order {
        order_id: data.order_id,
        symbol,
        side,
        kind,
        quantity,
        price: Some(price),
        filled_quantity,
        remaining_quantity,
        status,
        time_in_force: None,
        timestamp,
    }))
}

fn decode_balance(push: MexcPushData) -> Result<PrivateEvent, SocketError> {
    let data: MexcPrivateBalance = serde_json::from_value(push.data)
        .map_err(|error| SocketError::Deserialise { error, payload: push.channel })?;

    Ok(PrivateEvent::AssetBalance(AssetBalance {
        asset: SmolStr::from(data.asset),
        available: parse_decimal(&data.free, "free")?,
        locked: parse_decimal(&data.locked, "locked")?,
    }))
}

/// Decode one private push, or `None` if `push.channel` isn't an order/balance channel this
/// session recognises (eg/ a pong or an as-yet-unmapped channel).
fn decode_private_push(
    push: MexcPushData,
    symbols: &dyn SymbolMapper,
) -> Option<Result<PrivateEvent, SocketError>> {
    if push.channel.contains("private.orders") {
        Some(decode_order(push, symbols))
    } else if push.channel.contains("private.account") {
        Some(decode_balance(push))
    } else {
        None
    }
}

async fn connect_private_stream(
    listen_key: String,
    symbols: Arc<dyn SymbolMapper + Send + Sync>,
) -> Result<impl Stream<Item = Result<PrivateEvent, DataError>>, DataError> {
    let url = format!("{BASE_URL_MEXC}?listenKey={listen_key}");
    let websocket = xt_core::protocol::websocket::connect(url)
        .await
        .map_err(DataError::from)?;

    Ok(websocket.filter_map(move |message| {
        let symbols = symbols.clone();
        async move {
            let parsed = <WebSocketSerdeParser as StreamParser<MexcPushData>>::parse(message)?;
            match parsed {
                Ok(push) => decode_private_push(push, symbols.as_ref())
                    .map(|result| result.map_err(DataError::from)),
                Err(error) => Some(Err(DataError::from(error))),
            }
        }
    }))
}

/// Spawn the reconnecting MEXC private session: connects with the listen key currently held by
/// `listen_key`, decodes order/balance pushes using `symbols`, and dispatches every decoded
/// [`PrivateEvent`] to `registry` (spec §4.8 `bind`) until the returned [`JoinHandle`] is aborted.
///
/// Reconnects with [`STREAM_RECONNECTION_POLICY`] backoff, re-reading `listen_key` on every
/// attempt - a listen key re-created by the façade's keep-alive task after a failed refresh is
/// picked up on the very next reconnect.
pub fn spawn_private_stream(
    listen_key: ListenKeyHandle,
    symbols: Arc<dyn SymbolMapper + Send + Sync>,
    registry: Arc<PrivateChannelRegistry>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let init = move || {
            let listen_key = listen_key.clone();
            let symbols = symbols.clone();
            async move { connect_private_stream(listen_key.get(), symbols).await }
        };

        let stream = match init_reconnecting_stream(init).await {
            Ok(stream) => stream,
            Err(error) => {
                error!(?error, "failed to establish initial MEXC private WebSocket connection");
                return;
            }
        };

        let stream_key = StreamKey {
            exchange: ExchangeId::MexcSpot,
            kind: "private",
        };

        let mut events = stream
            .with_reconnect_backoff(STREAM_RECONNECTION_POLICY, stream_key)
            .with_termination_on_error(|error: &DataError| error.is_terminal(), stream_key)
            .with_reconnection_events(ExchangeId::MexcSpot)
            .with_error_handler(|error| warn!(?error, "MEXC private stream error"));

        while let Some(event) = events.next().await {
            if let reconnect::Event::Item(private_event) = event {
                registry.dispatch(&private_event);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xt_model::symbol::Symbol;

    struct TestSymbolMapper;

    impl SymbolMapper for TestSymbolMapper {
        fn to_pair(&self, symbol: &Symbol) -> Option<String> {
            Some(format!("{}{}", symbol.base, symbol.quote))
        }

        fn to_symbol(&self, pair: &str) -> Option<Symbol> {
            pair.strip_suffix("USDT").map(|base| Symbol::new(base, "USDT"))
        }
    }

    fn order_push(data: serde_json::Value) -> MexcPushData {
        MexcPushData {
            channel: "spot@private.orders.v3.api".to_string(),
            symbol: Some("BTCUSDT".to_string()),
            timestamp_ms: Some(1_700_000_000_000),
            data,
        }
    }

    fn balance_push(data: serde_json::Value) -> MexcPushData {
        MexcPushData {
            channel: "spot@private.account.v3.api".to_string(),
            symbol: None,
            timestamp_ms: Some(1_700_000_000_000),
            data,
        }
    }

    #[test]
    fn decodes_new_order_push_into_canonical_order() {
        let push = order_push(serde_json::json!({
            "i": "123456", "s": "BTCUSDT", "S": 1, "o": 1,
            "p": "50000", "v": "1", "a": "0.25", "st": 3, "ct": 1_700_000_000_000i64,
        }));

        let event = decode_private_push(push, &TestSymbolMapper).unwrap().unwrap();

        match event {
            PrivateEvent::Order(order) => {
                assert_eq!(order.order_id, "123456");
                assert_eq!(order.symbol, Symbol::new("BTC", "USDT"));
                assert_eq!(order.side, Side::Buy);
                assert_eq!(order.kind, OrderKind::Limit);
                assert_eq!(order.status, OrderStatus::PartiallyFilled);
                assert_eq!(order.filled_quantity, Decimal::new(25, 2));
                assert_eq!(order.remaining_quantity, Decimal::new(75, 2));
            }
            other => panic!("expected Order event, got {other:?}"),
        }
    }

    #[test]
    fn decodes_balance_push_into_canonical_asset_balance() {
        let push = balance_push(serde_json::json!({
            "a": "USDT", "f": "1000.5", "l": "10",
        }));

        let event = decode_private_push(push, &TestSymbolMapper).unwrap().unwrap();

        match event {
            PrivateEvent::AssetBalance(balance) => {
                assert_eq!(balance.asset, SmolStr::from("USDT"));
                assert_eq!(balance.available, Decimal::new(10005, 1));
                assert_eq!(balance.locked, Decimal::new(10, 0));
            }
            other => panic!("expected AssetBalance event, got {other:?}"),
        }
    }

    #[test]
    fn unrecognised_channel_yields_no_event() {
        let push = MexcPushData {
            channel: "spot@public.bookTicker.v3.api@BTCUSDT".to_string(),
            symbol: Some("BTCUSDT".to_string()),
            timestamp_ms: Some(1_700_000_000_000),
            data: serde_json::json!({}),
        };

        assert!(decode_private_push(push, &TestSymbolMapper).is_none());
    }

    #[test]
    fn unmapped_order_symbol_is_an_error() {
        let push = order_push(serde_json::json!({
            "i": "1", "s": "UNKNOWNPAIR", "S": 1, "o": 1,
            "p": "1", "v": "1", "a": "0", "st": 1, "ct": 1_700_000_000_000i64,
        }));

        match decode_private_push(push, &TestSymbolMapper) {
            Some(Err(SocketError::Unsupported { item, .. })) => {
                assert!(item.contains("unmapped private order symbol"));
            }
            other => panic!("expected Unsupported error, got {other:?}"),
        }
    }

    #[test]
    fn listen_key_handle_reads_back_the_latest_value() {
        let handle = ListenKeyHandle::new("initial");
        assert_eq!(handle.get(), "initial");

        handle.set("rotated");
        assert_eq!(handle.get(), "rotated");
    }
}
