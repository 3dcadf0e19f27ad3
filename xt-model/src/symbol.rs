use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::{Display, Formatter};

/// A canonical `(base, quote)` trading pair. Carries no venue prefix or separator - each venue
/// adapter's [`SymbolMapper`] is solely responsible for translating to/from the venue's native
/// wire representation (e.g. `BTCUSDT`, `BTC_USDT`, `BTC_USDT_20241225`).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct Symbol {
    pub base: SmolStr,
    pub quote: SmolStr,
}

impl Symbol {
    pub fn new(base: impl Into<SmolStr>, quote: impl Into<SmolStr>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Per-venue translator between the canonical [`Symbol`] and the venue's native symbol string.
///
/// Implementations are built once at startup from a `SymbolInfo` discovery call and are O(1)
/// thereafter - strategy code never holds a venue-native string.
pub trait SymbolMapper {
    /// Translate a canonical [`Symbol`] into this venue's wire representation.
    fn to_pair(&self, symbol: &Symbol) -> Option<String>;

    /// Translate a venue wire string back into a canonical [`Symbol`].
    fn to_symbol(&self, pair: &str) -> Option<Symbol>;

    /// Whether `pair` (a venue-native string) is supported by this venue.
    fn is_supported_pair(&self, pair: &str) -> bool {
        self.to_symbol(pair).is_some()
    }
}
