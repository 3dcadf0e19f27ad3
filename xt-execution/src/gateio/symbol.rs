use smol_str::{SmolStr, StrExt, format_smolstr};
use xt_model::symbol::{Symbol, SymbolMapper};

/// Shared Gate.io spot/futures symbol mapper: `BASE_QUOTE` (eg/ `"BTC_USDT"`), identical format
/// for spot currency pairs and USDT-settled futures contracts (spec §3, §6).
#[derive(Debug, Clone, Copy, Default)]
pub struct GateioSymbolMapper;

impl SymbolMapper for GateioSymbolMapper {
    fn to_pair(&self, symbol: &Symbol) -> Option<String> {
        Some(format_smolstr!("{}_{}", symbol.base, symbol.quote).to_uppercase_smolstr().to_string())
    }

    fn to_symbol(&self, pair: &str) -> Option<Symbol> {
        let (base, quote) = pair.to_uppercase().split_once('_').map(|(b, q)| (b.to_string(), q.to_string()))?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some(Symbol::new(SmolStr::new(base), SmolStr::new(quote)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_underscore_separated_pair() {
        let mapper = GateioSymbolMapper;
        let symbol = Symbol::new("BTC", "USDT");
        let pair = mapper.to_pair(&symbol).unwrap();
        assert_eq!(pair, "BTC_USDT");
        assert_eq!(mapper.to_symbol(&pair), Some(symbol));
    }

    #[test]
    fn rejects_pair_without_separator() {
        let mapper = GateioSymbolMapper;
        assert_eq!(mapper.to_symbol("BTCUSDT"), None);
    }
}
