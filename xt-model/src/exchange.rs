use crate::instrument::MarketDataInstrumentKind;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Unique identifier for a supported venue + market combination.
///
/// ### Notes
/// A venue may have a distinct server for different market kinds (e.g. Gate.io spot vs.
/// Gate.io's USDT-settled and BTC-settled perpetual futures) - these are therefore represented
/// as unique variants, matching the venue's own API segmentation.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeId {
    MexcSpot,
    GateioSpot,
    GateioPerpetualsUsd,
    GateioPerpetualsBtc,
}

impl ExchangeId {
    pub const fn is_futures(self) -> bool {
        matches!(
            self,
            ExchangeId::GateioPerpetualsUsd | ExchangeId::GateioPerpetualsBtc
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ExchangeId::MexcSpot => "mexc_spot",
            ExchangeId::GateioSpot => "gateio_spot",
            ExchangeId::GateioPerpetualsUsd => "gateio_perpetuals_usd",
            ExchangeId::GateioPerpetualsBtc => "gateio_perpetuals_btc",
        }
    }

    /// Whether this venue trades the given [`MarketDataInstrumentKind`] at all (spot venues never
    /// list perpetuals and vice versa - unlike a general-purpose multi-market venue).
    pub const fn supports_instrument_kind(self, kind: MarketDataInstrumentKind) -> bool {
        match (self, kind) {
            (ExchangeId::MexcSpot | ExchangeId::GateioSpot, MarketDataInstrumentKind::Spot) => {
                true
            }
            (
                ExchangeId::GateioPerpetualsUsd | ExchangeId::GateioPerpetualsBtc,
                MarketDataInstrumentKind::Perpetual,
            ) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_venues_reject_perpetual_instruments() {
        assert!(ExchangeId::MexcSpot.supports_instrument_kind(MarketDataInstrumentKind::Spot));
        assert!(!ExchangeId::MexcSpot.supports_instrument_kind(MarketDataInstrumentKind::Perpetual));
    }

    #[test]
    fn futures_venues_reject_spot_instruments() {
        assert!(
            ExchangeId::GateioPerpetualsUsd
                .supports_instrument_kind(MarketDataInstrumentKind::Perpetual)
        );
        assert!(
            !ExchangeId::GateioPerpetualsUsd.supports_instrument_kind(MarketDataInstrumentKind::Spot)
        );
    }
}
