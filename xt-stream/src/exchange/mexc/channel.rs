use super::Mexc;
use crate::{
    Identifier,
    subscription::{Subscription, book::OrderBooksL1, trade::PublicTrades},
};
use serde::Serialize;

/// Defines how to translate a [`Subscription`] into an [`MexcChannel`] base string for
/// WebSocket subscriptions.
///
/// The actual subscription topic sent to MEXC is constructed by appending "@<symbol>" to this
/// base channel string, eg/ "spot@public.deals.v3.api@BTCUSDT".
///
/// MEXC WebSocket API (Spot V3) Documentation:
/// - Trade streams: <https://mexcdevelop.github.io/apidocs/spot_v3_en/#trade-streams>
/// - Individual symbol book ticker: <https://mexcdevelop.github.io/apidocs/spot_v3_en/#individual-symbol-book-ticker-streams>
/// - Public Subscription Method: <https://mexcdevelop.github.io/apidocs/spot_v3_en/#public-subscription>
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub struct MexcChannel(pub &'static str);

impl MexcChannel {
    /// [`Mexc`]'s real-time public deals (trades) stream.
    pub const PUBLIC_DEALS: Self = Self("spot@public.deals.v3.api");

    /// [`Mexc`]'s real-time public book ticker (best bid/ask) stream.
    pub const PUBLIC_BOOK_TICKER: Self = Self("spot@public.bookTicker.v3.api");
}

impl<Instrument> Identifier<MexcChannel> for Subscription<Mexc, Instrument, PublicTrades> {
    fn id(&self) -> MexcChannel {
        MexcChannel::PUBLIC_DEALS
    }
}

impl<Instrument> Identifier<MexcChannel> for Subscription<Mexc, Instrument, OrderBooksL1> {
    fn id(&self) -> MexcChannel {
        MexcChannel::PUBLIC_BOOK_TICKER
    }
}

impl AsRef<str> for MexcChannel {
    fn as_ref(&self) -> &str {
        self.0
    }
}
