use crate::{Identifier, subscription::Subscription};
use xt_core::subscription::SubscriptionId;
use serde::Deserialize;

/// Defines an exchange specific market and channel combination used by an exchange
/// [`Connector`](super::Connector) to build the
/// [`WsMessage`](xt_core::protocol::websocket::WsMessage) subscription payloads to
/// send to the exchange server.
///
/// ### Examples
/// #### Gate.io OrderBooksL1
/// ```json
/// ExchangeSub {
///     channel: GateioChannel("spot.book_ticker"),
///     market: GateioMarket("btc_usdt"),
/// }
/// ```
/// #### MEXC PublicTrades
/// ```json
/// ExchangeSub {
///     channel: MexcChannel("spot@public.deals.v3.api.pb"),
///     market: MexcMarket("BTCUSDT")
/// }
/// ```
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize)]
pub struct ExchangeSub<Channel, Market> {
    /// Type that defines how to translate a [`Subscription`] into an exchange specific
    /// channel to be subscribed to.
    ///
    /// ### Examples
    /// - [`GateioChannel("spot.book_ticker")`](super::gateio::channel::GateioChannel)
    /// - [`MexcChannel("spot@public.deals.v3.api.pb")`](super::mexc::channel::MexcChannel)
    pub channel: Channel,

    /// Type that defines how to translate a [`Subscription`] into an exchange specific
    /// market that can be subscribed to.
    ///
    /// ### Examples
    /// - [`GateioMarket("btc_usdt")`](super::gateio::market::GateioMarket)
    /// - [`MexcMarket("BTCUSDT")`](super::mexc::market::MexcMarket)
    pub market: Market,
}

impl<Channel, Market> Identifier<SubscriptionId> for ExchangeSub<Channel, Market>
where
    Channel: AsRef<str>,
    Market: AsRef<str>,
{
    fn id(&self) -> SubscriptionId {
        SubscriptionId::from(format!(
            "{}|{}",
            self.channel.as_ref(),
            self.market.as_ref()
        ))
    }
}

impl<Channel, Market> ExchangeSub<Channel, Market>
where
    Channel: AsRef<str>,
    Market: AsRef<str>,
{
    /// Construct a new exchange specific [`Self`] with the Barter [`Subscription`] provided.
    pub fn new<Exchange, Instrument, Kind>(sub: &Subscription<Exchange, Instrument, Kind>) -> Self
    where
        Subscription<Exchange, Instrument, Kind>: Identifier<Channel> + Identifier<Market>,
    {
        Self {
            channel: sub.id(),
            market: sub.id(),
        }
    }
}

impl<Channel, Market> From<(Channel, Market)> for ExchangeSub<Channel, Market>
where
    Channel: AsRef<str>,
    Market: AsRef<str>,
{
    fn from((channel, market): (Channel, Market)) -> Self {
        Self { channel, market }
    }
}
