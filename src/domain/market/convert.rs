//! Conversions: positional OKX rows → typed market records.

use super::wire::{BookSnapshot, CandleRow};
use super::{BookLevel, Candle, OrderBook, Stats24h, Ticker};
use crate::error::GatewayError;
use crate::shared::serde_util::{parse_decimal_opt, parse_millis_opt};
use rust_decimal::Decimal;

fn required_decimal(row: &[String], idx: usize, field: &str) -> Result<Decimal, GatewayError> {
    row.get(idx)
        .and_then(|s| parse_decimal_opt(s))
        .ok_or_else(|| GatewayError::Other(format!("candle row missing {field}")))
}

impl TryFrom<CandleRow> for Candle {
    type Error = GatewayError;

    fn try_from(row: CandleRow) -> Result<Self, Self::Error> {
        let ts = row
            .first()
            .and_then(|s| parse_millis_opt(s))
            .ok_or_else(|| GatewayError::Other("candle row missing ts".to_string()))?;
        Ok(Candle {
            ts,
            open: required_decimal(&row, 1, "open")?,
            high: required_decimal(&row, 2, "high")?,
            low: required_decimal(&row, 3, "low")?,
            close: required_decimal(&row, 4, "close")?,
            vol: required_decimal(&row, 5, "vol")?,
            vol_ccy: row.get(6).and_then(|s| parse_decimal_opt(s)),
            vol_ccy_quote: row.get(7).and_then(|s| parse_decimal_opt(s)),
            confirm: row.get(8).is_some_and(|s| s == "1"),
        })
    }
}

/// Levels that fail to parse are skipped.
fn levels(raw: Vec<Vec<String>>) -> Vec<BookLevel> {
    raw.into_iter()
        .filter_map(|level| {
            let px = parse_decimal_opt(level.first()?)?;
            let sz = parse_decimal_opt(level.get(1)?)?;
            let orders = level
                .get(3)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default();
            Some(BookLevel { px, sz, orders })
        })
        .collect()
}

impl OrderBook {
    pub(crate) fn from_snapshot(inst_id: &str, snapshot: BookSnapshot) -> Self {
        OrderBook {
            inst_id: inst_id.to_string(),
            asks: levels(snapshot.asks),
            bids: levels(snapshot.bids),
            ts: parse_millis_opt(&snapshot.ts),
        }
    }
}

impl From<&Ticker> for Stats24h {
    fn from(t: &Ticker) -> Self {
        let change = t.last.zip(t.open_24h).map(|(last, open)| last - open);
        let change_pct = change.zip(t.open_24h).and_then(|(change, open)| {
            (!open.is_zero()).then(|| change / open * Decimal::ONE_HUNDRED)
        });
        Stats24h {
            inst_id: t.inst_id.clone(),
            last: t.last,
            open_24h: t.open_24h,
            high_24h: t.high_24h,
            low_24h: t.low_24h,
            vol_24h: t.vol_24h,
            vol_ccy_24h: t.vol_ccy_24h,
            change_24h: change,
            change_pct_24h: change_pct,
            ts: t.ts,
        }
    }
}
