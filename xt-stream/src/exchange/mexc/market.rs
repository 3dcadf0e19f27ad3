use super::Mexc;
use crate::{
    Identifier,
    instrument::MarketInstrumentData,
    subscription::Subscription,
};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, StrExt, format_smolstr};
use xt_model::instrument::{Keyed, MarketDataInstrument};

/// Type that defines how to translate a [`Subscription`] into a [`Mexc`] market symbol that
/// can be subscribed to.
///
/// MEXC spot symbols are the concatenated, uppercased `base`+`quote` pair with no separator
/// (eg/ `"BTCUSDT"`), unlike Gate.io's underscore-separated [`GateioMarket`](super::super::gateio::market::GateioMarket).
///
/// See docs: <https://mexcdevelop.github.io/apidocs/spot_v3_en/#public-subscription>
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
pub struct MexcMarket(pub SmolStr);

impl<Kind> Identifier<MexcMarket> for Subscription<Mexc, MarketDataInstrument, Kind> {
    fn id(&self) -> MexcMarket {
        mexc_market(&self.instrument)
    }
}

impl<InstrumentKey, Kind> Identifier<MexcMarket>
    for Subscription<Mexc, Keyed<InstrumentKey, MarketDataInstrument>, Kind>
{
    fn id(&self) -> MexcMarket {
        mexc_market(&self.instrument.value)
    }
}

impl<InstrumentKey, Kind> Identifier<MexcMarket>
    for Subscription<Mexc, MarketInstrumentData<InstrumentKey>, Kind>
{
    fn id(&self) -> MexcMarket {
        MexcMarket(self.instrument.name_exchange.name().to_uppercase_smolstr())
    }
}

impl AsRef<str> for MexcMarket {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

fn mexc_market(instrument: &MarketDataInstrument) -> MexcMarket {
    let MarketDataInstrument { base, quote, .. } = instrument;
    MexcMarket(format_smolstr!("{base}{quote}").to_uppercase_smolstr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xt_model::instrument::MarketDataInstrumentKind;

    #[test]
    fn test_mexc_market_concatenates_uppercased_base_quote() {
        let instrument = MarketDataInstrument::new("btc", "usdt", MarketDataInstrumentKind::Spot);
        assert_eq!(mexc_market(&instrument).0.as_str(), "BTCUSDT");
    }
}
