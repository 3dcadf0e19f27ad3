use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Balance of a single asset on a single venue account.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetBalance {
    pub asset: SmolStr,
    pub available: Decimal,
    pub locked: Decimal,
}

impl AssetBalance {
    pub fn total(&self) -> Decimal {
        self.available + self.locked
    }
}
