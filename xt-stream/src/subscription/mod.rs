use crate::{
    exchange::{Connector, ExchangeId},
    instrument::{InstrumentData, KeyedInstrument},
};
use xt_core::{error::SocketError, protocol::websocket::WsMessage, subscription::SubscriptionId, Validator};
use xt_model::instrument::{MarketDataInstrument, MarketDataInstrumentKind};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{Debug, Display, Formatter},
    hash::Hash,
};

/// [`account::PrivateChannelKind`], [`account::PrivateEvent`] and [`account::PrivateChannelRegistry`]
/// for a venue's authenticated (listen-key) WebSocket channel.
pub mod account;

/// OrderBook [`SubscriptionKind`]s and the associated output data models.
pub mod book;

/// Candle [`SubscriptionKind`] and the associated output data model.
pub mod candle;

/// Liquidation [`SubscriptionKind`] and the associated output data model.
pub mod liquidation;

/// Public trade [`SubscriptionKind`] and the associated output data model.
pub mod trade;

/// Defines the type of a [`Subscription`], and the output [`Self::Event`] that it yields.
pub trait SubscriptionKind
where
    Self: Debug + Clone,
{
    type Event: Debug;

    /// Short identifier used both in the WebSocket session's subscription registry (spec C10) and
    /// in [`Subscription`]'s `Display` impl (eg/ `"l1"`, `"l2"`, `"trades"`).
    fn as_str(&self) -> &'static str;
}

/// Subscription to a market data [`SubscriptionKind`] for a particular exchange instrument
/// (spec C10: the channel registry records these so reconnects can replay them).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct Subscription<Exchange = ExchangeId, Inst = MarketDataInstrument, Kind = SubKind> {
    pub exchange: Exchange,
    #[serde(flatten)]
    pub instrument: Inst,
    #[serde(alias = "type")]
    pub kind: Kind,
}

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize, Display,
)]
pub enum SubKind {
    PublicTrades,
    OrderBooksL1,
    OrderBooksL2,
    OrderBooksL3,
    Liquidations,
    Candles,
}

impl<Exchange, Instrument, Kind> Display for Subscription<Exchange, Instrument, Kind>
where
    Exchange: Display,
    Instrument: Display,
    Kind: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}{}", self.exchange, self.kind, self.instrument)
    }
}

impl<Exchange, S, Kind> From<(Exchange, S, S, MarketDataInstrumentKind, Kind)>
    for Subscription<Exchange, MarketDataInstrument, Kind>
where
    S: Into<smol_str::SmolStr>,
{
    fn from(
        (exchange, base, quote, instrument_kind, kind): (
            Exchange,
            S,
            S,
            MarketDataInstrumentKind,
            Kind,
        ),
    ) -> Self {
        Self::new(exchange, (base, quote, instrument_kind), kind)
    }
}

impl<InstrumentId, Exchange, S, Kind>
    From<(InstrumentId, Exchange, S, S, MarketDataInstrumentKind, Kind)>
    for Subscription<Exchange, KeyedInstrument<InstrumentId>, Kind>
where
    S: Into<smol_str::SmolStr>,
{
    fn from(
        (instrument_id, exchange, base, quote, instrument_kind, kind): (
            InstrumentId,
            Exchange,
            S,
            S,
            MarketDataInstrumentKind,
            Kind,
        ),
    ) -> Self {
        let instrument = KeyedInstrument::new(instrument_id, (base, quote, instrument_kind).into());

        Self::new(exchange, instrument, kind)
    }
}

impl<Exchange, I, Instrument, Kind> From<(Exchange, I, Kind)>
    for Subscription<Exchange, Instrument, Kind>
where
    I: Into<Instrument>,
{
    fn from((exchange, instrument, kind): (Exchange, I, Kind)) -> Self {
        Self::new(exchange, instrument, kind)
    }
}

impl<Instrument, Exchange, Kind> Subscription<Exchange, Instrument, Kind> {
    /// Constructs a new [`Subscription`] using the provided configuration.
    pub fn new<I>(exchange: Exchange, instrument: I, kind: Kind) -> Self
    where
        I: Into<Instrument>,
    {
        Self {
            exchange,
            instrument: instrument.into(),
            kind,
        }
    }
}

impl<Exchange, Kind> Validator for &Subscription<Exchange, MarketDataInstrument, Kind>
where
    Exchange: Connector,
{
    fn validate(self) -> Result<Self, SocketError>
    where
        Self: Sized,
    {
        let exchange = Exchange::ID;

        if exchange.supports_instrument_kind(self.instrument.kind) {
            Ok(self)
        } else {
            Err(SocketError::Unsupported {
                entity: exchange.as_str(),
                item: self.instrument.kind.to_string(),
            })
        }
    }
}

impl<Instrument> Validator for Subscription<ExchangeId, Instrument, SubKind>
where
    Instrument: InstrumentData,
{
    fn validate(self) -> Result<Self, SocketError>
    where
        Self: Sized,
    {
        if self.exchange.supports_instrument_kind(*self.instrument.kind()) {
            Ok(self)
        } else {
            Err(SocketError::Unsupported {
                entity: self.exchange.as_str(),
                item: self.instrument.kind().to_string(),
            })
        }
    }
}

/// Metadata generated from a collection of [`Subscription`]s, including the exchange specific
/// subscription payloads that are sent to the exchange.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SubscriptionMeta<InstrumentId> {
    /// `HashMap` containing the mapping between a [`SubscriptionId`] and its associated
    /// instrument.
    pub instrument_map: Map<InstrumentId>,
    /// Collection of [`WsMessage`]s containing exchange specific subscription payloads to be sent.
    pub ws_subscriptions: Vec<WsMessage>,
}

/// New type `HashMap` that maps a [`SubscriptionId`] to some associated type `T`.
///
/// Used by transformers to identify the instrument associated with incoming exchange messages.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Map<T>(pub HashMap<SubscriptionId, T>);

impl<T> FromIterator<(SubscriptionId, T)> for Map<T> {
    fn from_iter<Iter>(iter: Iter) -> Self
    where
        Iter: IntoIterator<Item = (SubscriptionId, T)>,
    {
        Self(iter.into_iter().collect::<HashMap<SubscriptionId, T>>())
    }
}

impl<T> Map<T> {
    /// Find the `T` associated with the provided [`SubscriptionId`].
    pub fn find<SubId>(&self, id: &SubId) -> Result<&T, SocketError>
    where
        SubscriptionId: Borrow<SubId>,
        SubId: AsRef<str> + Hash + Eq + ?Sized,
    {
        self.0
            .get(id)
            .ok_or_else(|| SocketError::Unidentifiable(SubscriptionId::from(id.as_ref())))
    }

    /// Find the mutable reference to `T` associated with the provided [`SubscriptionId`].
    pub fn find_mut<SubId>(&mut self, id: &SubId) -> Result<&mut T, SocketError>
    where
        SubscriptionId: Borrow<SubId>,
        SubId: AsRef<str> + Hash + Eq + ?Sized,
    {
        self.0
            .get_mut(id)
            .ok_or_else(|| SocketError::Unidentifiable(SubscriptionId::from(id.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod subscription {
        use super::*;
        use crate::{
            exchange::{gateio::spot::GateioSpot, mexc::Mexc},
            subscription::{book::OrderBooksL1, trade::PublicTrades},
        };

        mod de {
            use super::*;

            #[test]
            fn test_subscription_mexc_spot_public_trades() {
                let input = r#"
                {
                    "exchange": "mexc_spot",
                    "base": "btc",
                    "quote": "usdt",
                    "instrument_kind": "spot",
                    "kind": "public_trades"
                }
                "#;

                serde_json::from_str::<Subscription<Mexc, MarketDataInstrument, PublicTrades>>(input)
                    .unwrap();
            }

            #[test]
            fn test_subscription_gateio_spot_order_books_l1() {
                let input = r#"
                {
                    "exchange": "gateio_spot",
                    "base": "btc",
                    "quote": "usdt",
                    "instrument_kind": "spot",
                    "kind": "order_books_l1"
                }
                "#;

                serde_json::from_str::<Subscription<GateioSpot, MarketDataInstrument, OrderBooksL1>>(
                    input,
                )
                .unwrap();
            }
        }

        #[test]
        fn test_validate_mexc_rejects_perpetual() {
            struct TestCase {
                input: Subscription<Mexc, MarketDataInstrument, PublicTrades>,
                expect_ok: bool,
            }

            let tests = vec![
                TestCase {
                    // TC0: MEXC supports Spot PublicTrades
                    input: Subscription::from((
                        Mexc,
                        "base",
                        "quote",
                        MarketDataInstrumentKind::Spot,
                        PublicTrades,
                    )),
                    expect_ok: true,
                },
                TestCase {
                    // TC1: MEXC does not list Perpetual instruments
                    input: Subscription::from((
                        Mexc,
                        "base",
                        "quote",
                        MarketDataInstrumentKind::Perpetual,
                        PublicTrades,
                    )),
                    expect_ok: false,
                },
            ];

            for (index, test) in tests.into_iter().enumerate() {
                let actual = (&test.input).validate();
                assert_eq!(actual.is_ok(), test.expect_ok, "TC{index} failed");
            }
        }
    }

    mod instrument_map {
        use super::*;

        #[test]
        fn test_find_instrument() {
            let ids = Map(HashMap::from_iter([(
                SubscriptionId::from("present"),
                MarketDataInstrument::from((
                    "base",
                    "quote",
                    MarketDataInstrumentKind::Spot,
                )),
            )]));

            struct TestCase {
                input: SubscriptionId,
                expected: Result<MarketDataInstrument, SocketError>,
            }

            let cases = vec![
                TestCase {
                    // TC0: SubscriptionId (channel) is present in the HashMap
                    input: SubscriptionId::from("present"),
                    expected: Ok(MarketDataInstrument::from((
                        "base",
                        "quote",
                        MarketDataInstrumentKind::Spot,
                    ))),
                },
                TestCase {
                    // TC1: SubscriptionId (channel) is not present in the HashMap
                    input: SubscriptionId::from("not present"),
                    expected: Err(SocketError::Unidentifiable(SubscriptionId::from(
                        "not present",
                    ))),
                },
            ];

            for (index, test) in cases.into_iter().enumerate() {
                let actual = ids.find(&test.input);
                match (actual, test.expected) {
                    (Ok(actual), Ok(expected)) => {
                        assert_eq!(*actual, expected, "TC{index} failed")
                    }
                    (Err(_), Err(_)) => {
                        // Test passed
                    }
                    (actual, expected) => {
                        panic!(
                            "TC{index} failed because actual != expected. \nActual: {actual:?}\nExpected: {expected:?}\n"
                        );
                    }
                }
            }
        }
    }
}
