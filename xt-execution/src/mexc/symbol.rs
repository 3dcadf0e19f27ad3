use smol_str::{SmolStr, StrExt, format_smolstr};
use xt_model::symbol::{Symbol, SymbolMapper};

/// MEXC spot symbol mapper: concatenated, uppercased `base`+`quote` with no separator (eg/
/// `"BTCUSDT"`), matching `xt-stream`'s `MexcMarket` WS symbol format.
#[derive(Debug, Clone, Copy, Default)]
pub struct MexcSymbolMapper;

impl SymbolMapper for MexcSymbolMapper {
    fn to_pair(&self, symbol: &Symbol) -> Option<String> {
        Some(format_smolstr!("{}{}", symbol.base, symbol.quote).to_uppercase_smolstr().to_string())
    }

    fn to_symbol(&self, pair: &str) -> Option<Symbol> {
        // MEXC never echoes a separator, so splitting the concatenated pair back into base/quote
        // requires a known quote-asset suffix; USDT covers every symbol this core trades.
        let pair = pair.to_uppercase();
        for quote in ["USDT", "USDC", "BTC", "ETH"] {
            if let Some(base) = pair.strip_suffix(quote) {
                if !base.is_empty() {
                    return Some(Symbol::new(SmolStr::new(base), SmolStr::new(quote)));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_common_quote_assets() {
        let mapper = MexcSymbolMapper;
        let symbol = Symbol::new("BTC", "USDT");
        let pair = mapper.to_pair(&symbol).unwrap();
        assert_eq!(pair, "BTCUSDT");
        assert_eq!(mapper.to_symbol(&pair), Some(symbol));
    }
}
