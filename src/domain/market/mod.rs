//! Market data: tickers, books, trades, candles and public instrument data.

pub mod client;
mod convert;
pub mod wire;

use crate::shared::serde_util::{decimal_opt, millis_opt};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── Bar ─────────────────────────────────────────────────────────────────────

/// Candle width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bar {
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1H")]
    Hour1,
    #[serde(rename = "2H")]
    Hour2,
    #[serde(rename = "4H")]
    Hour4,
    #[serde(rename = "6H")]
    Hour6,
    #[serde(rename = "12H")]
    Hour12,
    #[serde(rename = "1D")]
    Day1,
    #[serde(rename = "1W")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl Bar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute3 => "3m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1H",
            Self::Hour2 => "2H",
            Self::Hour4 => "4H",
            Self::Hour6 => "6H",
            Self::Hour12 => "12H",
            Self::Day1 => "1D",
            Self::Week1 => "1W",
            Self::Month1 => "1M",
        }
    }
}

impl std::fmt::Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Ticker ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Ticker {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub last: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub last_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub ask_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub ask_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub bid_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub bid_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub open_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub high_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub low_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub vol_ccy_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub vol_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sod_utc0: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sod_utc8: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub ts: Option<DateTime<Utc>>,
}

// ─── Stats24h ────────────────────────────────────────────────────────────────

/// Rolling 24h summary derived from a ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats24h {
    pub inst_id: String,
    pub last: Option<Decimal>,
    pub open_24h: Option<Decimal>,
    pub high_24h: Option<Decimal>,
    pub low_24h: Option<Decimal>,
    pub vol_24h: Option<Decimal>,
    pub vol_ccy_24h: Option<Decimal>,
    pub change_24h: Option<Decimal>,
    /// Percent, e.g. `2.5` for +2.5%.
    pub change_pct_24h: Option<Decimal>,
    pub ts: Option<DateTime<Utc>>,
}

// ─── OrderBook ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookLevel {
    pub px: Decimal,
    pub sz: Decimal,
    pub orders: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderBook {
    pub inst_id: String,
    pub asks: Vec<BookLevel>,
    pub bids: Vec<BookLevel>,
    pub ts: Option<DateTime<Utc>>,
}

// ─── PublicTrade ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PublicTrade {
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub trade_id: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sz: Option<Decimal>,
    #[serde(default)]
    pub side: String,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub ts: Option<DateTime<Utc>>,
}

// ─── Candle ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub ts: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub vol: Decimal,
    pub vol_ccy: Option<Decimal>,
    pub vol_ccy_quote: Option<Decimal>,
    /// `false` while the candle is still forming.
    pub confirm: bool,
}

/// Query for `GET /okx/market/klines/{inst_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandleQuery {
    #[serde(default)]
    pub bar: Bar,
    pub limit: Option<u32>,
    /// Return candles older than this millisecond timestamp.
    pub after: Option<i64>,
    /// Return candles newer than this millisecond timestamp.
    pub before: Option<i64>,
}

// ─── Instrument ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Instrument {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub uly: String,
    #[serde(default)]
    pub inst_family: String,
    #[serde(default)]
    pub base_ccy: String,
    #[serde(default)]
    pub quote_ccy: String,
    #[serde(default)]
    pub settle_ccy: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub ct_val: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub ct_mult: Option<Decimal>,
    #[serde(default)]
    pub ct_val_ccy: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub tick_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub lot_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub min_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub max_lmt_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub max_mkt_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub lever: Option<Decimal>,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub list_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub exp_time: Option<DateTime<Utc>>,
}

// ─── Funding / mark ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct FundingRate {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub next_funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub funding_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub next_funding_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct MarkPrice {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub mark_px: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub ts: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_bar_serde() {
        let b: Bar = serde_json::from_str("\"4H\"").unwrap();
        assert_eq!(b, Bar::Hour4);
        assert_eq!(Bar::default().as_str(), "1m");
    }

    #[test]
    fn test_ticker_from_okx() {
        let t: Ticker = serde_json::from_str(
            r#"{"instType":"SPOT","instId":"BTC-USDT","last":"9999.99","lastSz":"0.1",
                "askPx":"9999.99","askSz":"11","bidPx":"8888.88","bidSz":"5",
                "open24h":"9000","high24h":"10000","low24h":"8888.88",
                "volCcy24h":"2222","vol24h":"2222","sodUtc0":"0.1","sodUtc8":"0.1",
                "ts":"1597026383085"}"#,
        )
        .unwrap();
        assert_eq!(t.open_24h, Some(Decimal::from(9000)));
        assert_eq!(t.bid_px, Some(Decimal::from_str("8888.88").unwrap()));
        assert!(t.ts.is_some());
    }
}
