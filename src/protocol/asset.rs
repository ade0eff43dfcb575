//! Asset amounts carried by operation payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset symbols known to the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetSymbol {
    /// Liquid native token
    Hive,
    /// Dollar-pegged token
    Hbd,
    /// Vesting shares
    Vests,
}

impl AssetSymbol {
    /// Number of decimal places of the symbol
    pub fn precision(&self) -> u32 {
        match self {
            AssetSymbol::Hive | AssetSymbol::Hbd => 3,
            AssetSymbol::Vests => 6,
        }
    }

    /// Ticker as printed in amounts
    pub fn ticker(&self) -> &'static str {
        match self {
            AssetSymbol::Hive => "HIVE",
            AssetSymbol::Hbd => "HBD",
            AssetSymbol::Vests => "VESTS",
        }
    }
}

/// Fixed-point amount of a single asset, stored in the smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Amount in the smallest unit of `symbol`
    pub amount: i64,
    /// Asset symbol
    pub symbol: AssetSymbol,
}

impl Asset {
    /// Create an asset from raw units
    pub const fn new(amount: i64, symbol: AssetSymbol) -> Self {
        Self { amount, symbol }
    }

    /// Liquid tokens in thousandths
    pub const fn hive(amount: i64) -> Self {
        Self::new(amount, AssetSymbol::Hive)
    }

    /// Dollar tokens in thousandths
    pub const fn hbd(amount: i64) -> Self {
        Self::new(amount, AssetSymbol::Hbd)
    }

    /// Vesting shares in millionths
    pub const fn vests(amount: i64) -> Self {
        Self::new(amount, AssetSymbol::Vests)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10i64.pow(self.symbol.precision());
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            abs / scale as u64,
            abs % scale as u64,
            self.symbol.ticker(),
            width = self.symbol.precision() as usize
        )
    }
}

/// Exchange rate between two assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Base amount
    pub base: Asset,
    /// Quote amount
    pub quote: Asset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_display() {
        assert_eq!(Asset::hive(1_000).to_string(), "1.000 HIVE");
        assert_eq!(Asset::hbd(25).to_string(), "0.025 HBD");
        assert_eq!(Asset::vests(1_234_567).to_string(), "1.234567 VESTS");
        assert_eq!(Asset::hive(-1_500).to_string(), "-1.500 HIVE");
    }

    #[test]
    fn test_symbol_serialization() {
        let json = serde_json::to_string(&AssetSymbol::Vests).unwrap();
        assert_eq!(json, "\"VESTS\"");
    }
}
