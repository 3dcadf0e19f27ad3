use self::{
    channel::MexcChannel,
    market::MexcMarket,
    subscription::{MexcWsMethod, MexcWsSub},
    trade::MexcPushData,
    validator::MexcWebSocketSubValidator,
};
use crate::{
    ExchangeWsStream, NoInitialSnapshots,
    exchange::{Connector, ExchangeSub, PingInterval, StreamSelector},
    instrument::InstrumentData,
    subscriber::WebSocketSubscriber,
    subscription::{Map, book::OrderBooksL1, trade::PublicTrades},
    transformer::stateless::StatelessTransformer,
};
use derive_more::Display;
use xt_core::{
    error::SocketError,
    protocol::websocket::{WebSocketSerdeParser, WsMessage},
};
use xt_macro::{DeExchange, SerExchange};
use xt_model::exchange::ExchangeId;
use std::{
    borrow::Cow,
    time::{SystemTime, UNIX_EPOCH},
};
use url::Url;

pub mod book;
pub mod channel;
pub mod market;

/// Authenticated listen-key private channel: order/balance pushes (spec §4.8), driven outside
/// the [`Connector`]/[`StreamSelector`] framework since a listen-key session isn't per-instrument.
pub mod private;

pub mod subscription;
pub mod trade;
pub mod validator;

/// MEXC WebSocket API base URL for public market data streams (Secure).
/// Docs: <https://mexcdevelop.github.io/apidocs/spot_v3_en/#websocket-market-data>
pub const BASE_URL_MEXC: &str = "wss://wbs-api.mexc.com/ws";

/// [`Mexc`] exchange connector definition.
///
/// Uses MEXC's plain JSON public WebSocket channels (not the protobuf-framed `.pb` variants).
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    DeExchange,
    SerExchange,
)]
pub struct Mexc;

impl Connector for Mexc {
    const ID: ExchangeId = ExchangeId::MexcSpot;
    type Channel = MexcChannel;
    type Market = MexcMarket;
    type Subscriber = WebSocketSubscriber;
    type SubValidator = MexcWebSocketSubValidator;
    type SubResponse = self::subscription::MexcSubResponse;

    fn url() -> Result<Url, SocketError> {
        Url::parse(BASE_URL_MEXC).map_err(SocketError::UrlParse)
    }

    fn ping_interval() -> Option<PingInterval> {
        None
    }

    fn requests(exchange_subs: Vec<ExchangeSub<Self::Channel, Self::Market>>) -> Vec<WsMessage> {
        if exchange_subs.is_empty() {
            return Vec::new();
        }

        let topics = exchange_subs
            .into_iter()
            .map(|sub| format!("{}@{}", sub.channel.0, sub.market.0))
            .collect::<Vec<String>>();

        let request_id = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let subscription_message = MexcWsSub {
            method: MexcWsMethod::Subscription,
            params: Cow::Owned(topics),
            id: request_id,
        };

        match serde_json::to_string(&subscription_message) {
            Ok(text_payload) => vec![WsMessage::Text(text_payload.into())],
            Err(e) => {
                eprintln!("Failed to serialize MEXC subscription request: {}", e);
                Vec::new()
            }
        }
    }

    fn expected_responses<InstrumentKey>(_: &Map<InstrumentKey>) -> usize {
        1
    }
}

impl<Instrument> StreamSelector<Instrument, PublicTrades> for Mexc
where
    Instrument: InstrumentData,
{
    type SnapFetcher = NoInitialSnapshots;
    type Stream = ExchangeWsStream<
        WebSocketSerdeParser,
        StatelessTransformer<Self, Instrument::Key, PublicTrades, MexcPushData>,
    >;
}

impl<Instrument> StreamSelector<Instrument, OrderBooksL1> for Mexc
where
    Instrument: InstrumentData,
{
    type SnapFetcher = NoInitialSnapshots;
    type Stream = ExchangeWsStream<
        WebSocketSerdeParser,
        StatelessTransformer<Self, Instrument::Key, OrderBooksL1, MexcPushData>,
    >;
}
