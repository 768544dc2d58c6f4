//! Shared enums and helpers used across the venue domains.
//!
//! Every enum serializes to the exact token OKX expects, so the same type can
//! appear in a gateway request and in the body forwarded to the venue.

pub mod serde_util;

use serde::{Deserialize, Serialize};

macro_rules! venue_token {
    ($ty:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $token),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ─── InstType ────────────────────────────────────────────────────────────────

/// OKX instrument family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstType {
    #[default]
    Spot,
    Margin,
    Swap,
    Futures,
    Option,
    Any,
}

venue_token!(InstType {
    Spot => "SPOT",
    Margin => "MARGIN",
    Swap => "SWAP",
    Futures => "FUTURES",
    Option => "OPTION",
    Any => "ANY",
});

impl InstType {
    /// Guess the family from an instrument id.
    ///
    /// `BTC-USDT-SWAP` → SWAP, `BTC-USD-240329` → FUTURES,
    /// `BTC-USD-240329-60000-C` → OPTION, anything else → MARGIN.
    pub fn infer(inst_id: &str) -> Self {
        let parts: Vec<&str> = inst_id.split('-').collect();
        match parts.as_slice() {
            [.., "SWAP"] => InstType::Swap,
            [_, _, expiry] if expiry.chars().all(|c| c.is_ascii_digit()) => InstType::Futures,
            p if p.len() >= 4 => InstType::Option,
            _ => InstType::Margin,
        }
    }
}

// ─── TradeMode ───────────────────────────────────────────────────────────────

/// `tdMode`: how an order is margined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeMode {
    #[default]
    Cash,
    Cross,
    Isolated,
}

venue_token!(TradeMode {
    Cash => "cash",
    Cross => "cross",
    Isolated => "isolated",
});

// ─── MarginMode ──────────────────────────────────────────────────────────────

/// `mgnMode` for leverage and position endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    #[default]
    Cross,
    Isolated,
}

venue_token!(MarginMode {
    Cross => "cross",
    Isolated => "isolated",
});

// ─── OrderSide ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

venue_token!(OrderSide {
    Buy => "buy",
    Sell => "sell",
});

impl OrderSide {
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

// ─── PositionSide ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
    Net,
}

venue_token!(PositionSide {
    Long => "long",
    Short => "short",
    Net => "net",
});

// ─── TriggerPriceType ────────────────────────────────────────────────────────

/// Which price feed fires a TP/SL or trigger order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPriceType {
    #[default]
    Last,
    Index,
    Mark,
}

venue_token!(TriggerPriceType {
    Last => "last",
    Index => "index",
    Mark => "mark",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_inst_type() {
        assert_eq!(InstType::infer("BTC-USDT-SWAP"), InstType::Swap);
        assert_eq!(InstType::infer("BTC-USD-240329"), InstType::Futures);
        assert_eq!(InstType::infer("BTC-USD-240329-60000-C"), InstType::Option);
        assert_eq!(InstType::infer("BTC-USDT"), InstType::Margin);
    }

    #[test]
    fn test_trade_mode_serde() {
        let m: TradeMode = serde_json::from_str("\"isolated\"").unwrap();
        assert_eq!(m, TradeMode::Isolated);
        assert_eq!(TradeMode::default().as_str(), "cash");
    }

    #[test]
    fn test_inst_type_serde() {
        assert_eq!(serde_json::to_string(&InstType::Swap).unwrap(), "\"SWAP\"");
        let t: InstType = serde_json::from_str("\"FUTURES\"").unwrap();
        assert_eq!(t, InstType::Futures);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(PositionSide::Net.to_string(), "net");
    }
}
