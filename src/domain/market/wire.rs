//! Inbound market-data shapes that OKX sends as positional arrays.

use serde::Deserialize;

/// `/api/v5/market/books` item. Each level is `[px, sz, "0", numOrders]`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BookSnapshot {
    #[serde(default)]
    pub asks: Vec<Vec<String>>,
    #[serde(default)]
    pub bids: Vec<Vec<String>>,
    #[serde(default)]
    pub ts: String,
}

/// `/api/v5/market/candles` row:
/// `[ts, o, h, l, c, vol, volCcy, volCcyQuote, confirm]`.
pub type CandleRow = Vec<String>;
