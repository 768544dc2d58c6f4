//! Account domain: configuration, balances, positions, leverage and limits.

pub mod client;
mod convert;
pub mod wire;

use crate::shared::serde_util::{decimal_opt, millis_opt};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── PositionMode ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    LongShortMode,
    NetMode,
}

impl PositionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongShortMode => "long_short_mode",
            Self::NetMode => "net_mode",
        }
    }
}

impl std::fmt::Display for PositionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── AccountConfig ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AccountConfig {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub main_uid: String,
    #[serde(default)]
    pub acct_lv: String,
    #[serde(default)]
    pub pos_mode: String,
    #[serde(default)]
    pub auto_loan: bool,
    #[serde(default)]
    pub greeks_type: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub level_tmp: String,
    #[serde(default)]
    pub ct_iso_mode: String,
    #[serde(default)]
    pub mgn_iso_mode: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub perm: String,
}

// ─── Balances ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AccountBalance {
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub total_eq: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub iso_eq: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub adj_eq: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub imr: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub mmr: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub mgn_ratio: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub notional_usd: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub u_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Vec<BalanceDetail>,
}

/// Per-currency balance line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct BalanceDetail {
    #[serde(default)]
    pub ccy: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub eq: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub cash_bal: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avail_bal: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avail_eq: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub frozen_bal: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub ord_frozen: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub upl: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub eq_usd: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub dis_eq: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub liab: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub u_time: Option<DateTime<Utc>>,
}

// ─── Positions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Position {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub mgn_mode: String,
    #[serde(default)]
    pub pos_id: String,
    #[serde(default)]
    pub pos_side: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub pos: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avail_pos: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avg_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub mark_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub upl: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub upl_ratio: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub lever: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub liq_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub margin: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub mgn_ratio: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub notional_usd: Option<Decimal>,
    #[serde(default)]
    pub ccy: String,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub c_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub u_time: Option<DateTime<Utc>>,
}

// ─── Leverage & limits ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct LeverageInfo {
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub mgn_mode: String,
    #[serde(default)]
    pub pos_side: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub lever: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct MaxSize {
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub ccy: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub max_buy: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub max_sell: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct MaxAvailSize {
    #[serde(default)]
    pub inst_id: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avail_buy: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avail_sell: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct FeeRate {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub level: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub maker: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub taker: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub maker_u: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub taker_u: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub delivery: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub exercise: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub ts: Option<DateTime<Utc>>,
}

/// Query for `GET /okx/account/fee-rates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeeRateQuery {
    #[serde(default)]
    pub inst_type: crate::shared::InstType,
    pub inst_id: Option<String>,
    pub uly: Option<String>,
    pub inst_family: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PositionModeAck {
    pub pos_mode: PositionMode,
}
