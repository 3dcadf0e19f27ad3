use xt_model::instrument::{
    InstrumentNameExchange, Keyed, MarketDataInstrument, MarketDataInstrumentKind,
};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Instrument related data that defines an associated unique `Id`.
///
/// Verbose `InstrumentData` is often used to subscribe to market data feeds, but its unique `Id`
/// can then be used to key consumed [MarketEvents](crate::event::MarketEvent), significantly
/// reducing duplication in the case of complex instruments.
pub trait InstrumentData
where
    Self: Clone + Debug + Send + Sync,
{
    type Key: Debug + Clone + Eq + Send + Sync;
    fn key(&self) -> &Self::Key;
    fn kind(&self) -> &MarketDataInstrumentKind;
}

/// Type alias for a [`MarketDataInstrument`] keyed by an arbitrary `InstrumentId` (eg/ a
/// façade's instrument table index).
pub type KeyedInstrument<InstrumentId> = Keyed<InstrumentId, MarketDataInstrument>;

impl<InstrumentKey> InstrumentData for Keyed<InstrumentKey, MarketDataInstrument>
where
    InstrumentKey: Debug + Clone + Eq + Send + Sync,
{
    type Key = InstrumentKey;

    fn key(&self) -> &Self::Key {
        &self.key
    }

    fn kind(&self) -> &MarketDataInstrumentKind {
        &self.value.kind
    }
}

impl InstrumentData for MarketDataInstrument {
    type Key = Self;

    fn key(&self) -> &Self::Key {
        self
    }

    fn kind(&self) -> &MarketDataInstrumentKind {
        &self.kind
    }
}

/// Flattened, `Display`-able instrument identity used to key consumed [`MarketEvent`]s
/// (spec C9) once a [`MarketDataInstrument`] has been resolved against a façade's instrument
/// table.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct MarketInstrumentData<InstrumentKey> {
    pub key: InstrumentKey,
    pub name_exchange: InstrumentNameExchange,
    pub kind: MarketDataInstrumentKind,
}

impl<InstrumentKey> InstrumentData for MarketInstrumentData<InstrumentKey>
where
    InstrumentKey: Debug + Clone + Eq + Send + Sync,
{
    type Key = InstrumentKey;

    fn key(&self) -> &Self::Key {
        &self.key
    }

    fn kind(&self) -> &MarketDataInstrumentKind {
        &self.kind
    }
}

impl<InstrumentKey> std::fmt::Display for MarketInstrumentData<InstrumentKey>
where
    InstrumentKey: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.key,
            self.name_exchange.as_ref(),
            self.kind
        )
    }
}

impl<InstrumentKey> From<&Keyed<InstrumentKey, MarketDataInstrument>>
    for MarketInstrumentData<InstrumentKey>
where
    InstrumentKey: Clone,
{
    fn from(value: &Keyed<InstrumentKey, MarketDataInstrument>) -> Self {
        Self {
            key: value.key.clone(),
            name_exchange: InstrumentNameExchange::new(format!(
                "{}_{}",
                value.value.base, value.value.quote
            )),
            kind: value.value.kind,
        }
    }
}
