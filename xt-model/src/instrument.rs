//! Market-data-stream scaffolding types (spec C9/C10). These sit one level below [`crate::Symbol`]:
//! `xt-stream`'s generic `Connector`/`MarketStream` plumbing is keyed by an `InstrumentKey` type
//! parameter so it can be wired up against either a bare [`MarketDataInstrument`] or a venue
//! [`Keyed`] wrapper around one, without the stream layer itself needing to know which.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt::{Display as FmtDisplay, Formatter};

/// Pairs a `Key` (eg/ an index into a façade's instrument table) with its associated `Value`,
/// without the `Value` needing to carry the key itself.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct Keyed<Key, Value> {
    pub key: Key,
    pub value: Value,
}

impl<Key, Value> Keyed<Key, Value> {
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }
}

impl<Key, Value> AsRef<Value> for Keyed<Key, Value> {
    fn as_ref(&self) -> &Value {
        &self.value
    }
}

impl<Key, Value> FmtDisplay for Keyed<Key, Value>
where
    Key: FmtDisplay,
    Value: FmtDisplay,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.key, self.value)
    }
}

/// Market type traded on a given `base_quote` market. Spec §2/§3 only ever needs spot & perpetual
/// futures (MEXC spot, Gate.io spot, Gate.io USDT/BTC perpetuals) - unlike the wider set of
/// contract kinds a general-purpose market-data framework supports.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataInstrumentKind {
    Spot,
    Perpetual,
}

impl Default for MarketDataInstrumentKind {
    fn default() -> Self {
        Self::Spot
    }
}

impl FmtDisplay for MarketDataInstrumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MarketDataInstrumentKind::Spot => "spot",
                MarketDataInstrumentKind::Perpetual => "perpetual",
            }
        )
    }
}

/// Uniquely identifies a `base_quote` market-data stream and its instrument type.
///
/// eg/ `MarketDataInstrument { base: "btc", quote: "usdt", kind: Spot }`
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketDataInstrument {
    pub base: SmolStr,
    pub quote: SmolStr,
    #[serde(rename = "instrument_kind")]
    pub kind: MarketDataInstrumentKind,
}

impl FmtDisplay for MarketDataInstrument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.base, self.quote, self.kind)
    }
}

impl<S> From<(S, S, MarketDataInstrumentKind)> for MarketDataInstrument
where
    S: Into<SmolStr>,
{
    fn from((base, quote, kind): (S, S, MarketDataInstrumentKind)) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
            kind,
        }
    }
}

impl MarketDataInstrument {
    pub fn new<S>(base: S, quote: S, kind: MarketDataInstrumentKind) -> Self
    where
        S: Into<SmolStr>,
    {
        Self {
            base: base.into(),
            quote: quote.into(),
            kind,
        }
    }
}

/// `SmolStr` representation of an instrument in the exact form the venue's own WebSocket channel
/// names use it (eg/ MEXC `"BTCUSDT"`, Gate.io `"BTC_USDT"`) - distinct from [`crate::Symbol`]
/// which is the canonical, venue-agnostic `(base, quote)` pair.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Display, From)]
pub struct InstrumentNameExchange(pub SmolStr);

impl InstrumentNameExchange {
    pub fn new<S>(name: S) -> Self
    where
        S: Into<SmolStr>,
    {
        Self(name.into())
    }

    pub fn name(&self) -> &SmolStr {
        &self.0
    }
}

impl From<&str> for InstrumentNameExchange {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for InstrumentNameExchange {
    fn borrow(&self) -> &str {
        self.0.borrow()
    }
}

impl AsRef<str> for InstrumentNameExchange {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_spot_instrument() {
        let input = r#"{"base": "btc", "quote": "usdt", "instrument_kind": "spot"}"#;
        let actual: MarketDataInstrument = serde_json::from_str(input).unwrap();
        assert_eq!(
            actual,
            MarketDataInstrument::from(("btc", "usdt", MarketDataInstrumentKind::Spot))
        );
    }

    #[test]
    fn deserialises_perpetual_instrument() {
        let input = r#"{"base": "btc", "quote": "usdt", "instrument_kind": "perpetual"}"#;
        let actual: MarketDataInstrument = serde_json::from_str(input).unwrap();
        assert_eq!(
            actual,
            MarketDataInstrument::from(("btc", "usdt", MarketDataInstrumentKind::Perpetual))
        );
    }

    #[test]
    fn instrument_name_exchange_borrows_as_str() {
        let name = InstrumentNameExchange::new("BTCUSDT");
        assert_eq!(name.as_ref(), "BTCUSDT");
        assert_eq!(name.to_string(), "BTCUSDT");
    }
}
