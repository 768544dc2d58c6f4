//! Algo-order domain: TP/SL, trigger, trailing stop, iceberg and TWAP.
//!
//! All five placements share [`AlgoOrderBase`] and land on the same venue
//! endpoint; only `ordType` and the strategy-specific fields differ.

pub mod client;
mod convert;
pub mod wire;

use crate::domain::{classify_okx, OkxAck};
use crate::shared::serde_util::{decimal_opt, millis_opt};
use crate::shared::{InstType, OrderSide, PositionSide, TradeMode, TriggerPriceType};
use crate::submit::{Classify, Disposition};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgoOrderType {
    Conditional,
    Oco,
    Trigger,
    MoveOrderStop,
    Iceberg,
    Twap,
}

impl AlgoOrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conditional => "conditional",
            Self::Oco => "oco",
            Self::Trigger => "trigger",
            Self::MoveOrderStop => "move_order_stop",
            Self::Iceberg => "iceberg",
            Self::Twap => "twap",
        }
    }
}

impl std::fmt::Display for AlgoOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgoOrderState {
    Live,
    Pause,
    PartiallyEffective,
    Effective,
    Canceled,
    OrderFailed,
}

impl AlgoOrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Pause => "pause",
            Self::PartiallyEffective => "partially_effective",
            Self::Effective => "effective",
            Self::Canceled => "canceled",
            Self::OrderFailed => "order_failed",
        }
    }

    /// Live and paused orders are served by the pending list; the rest by history.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Live | Self::Pause)
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Fields every algo placement carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlgoOrderBase {
    pub inst_id: String,
    #[serde(default)]
    pub td_mode: TradeMode,
    pub side: OrderSide,
    pub sz: String,
    pub pos_side: Option<PositionSide>,
    pub reduce_only: Option<bool>,
    pub tgt_ccy: Option<String>,
    pub algo_cl_ord_id: Option<String>,
    pub tag: Option<String>,
    pub ccy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TpSlRequest {
    #[serde(flatten)]
    pub base: AlgoOrderBase,
    pub tp_trigger_px: Option<String>,
    pub tp_ord_px: Option<String>,
    pub tp_trigger_px_type: Option<TriggerPriceType>,
    pub sl_trigger_px: Option<String>,
    pub sl_ord_px: Option<String>,
    pub sl_trigger_px_type: Option<TriggerPriceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerRequest {
    #[serde(flatten)]
    pub base: AlgoOrderBase,
    pub trigger_px: String,
    /// `-1` executes at market once triggered.
    pub order_px: String,
    pub trigger_px_type: Option<TriggerPriceType>,
    pub tp_trigger_px: Option<String>,
    pub tp_ord_px: Option<String>,
    pub sl_trigger_px: Option<String>,
    pub sl_ord_px: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailingStopRequest {
    #[serde(flatten)]
    pub base: AlgoOrderBase,
    pub callback_ratio: Option<String>,
    pub callback_spread: Option<String>,
    pub active_px: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IcebergRequest {
    #[serde(flatten)]
    pub base: AlgoOrderBase,
    pub px_var: Option<String>,
    pub px_spread: Option<String>,
    pub sz_limit: String,
    pub px_limit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwapRequest {
    #[serde(flatten)]
    pub base: AlgoOrderBase,
    pub px_var: Option<String>,
    pub px_spread: Option<String>,
    pub sz_limit: String,
    pub px_limit: String,
    /// Seconds between child orders.
    pub time_interval: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelAlgoRequest {
    pub inst_id: String,
    pub algo_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmendAlgoRequest {
    pub inst_id: String,
    pub algo_id: Option<String>,
    pub algo_cl_ord_id: Option<String>,
    pub cxl_on_fail: Option<bool>,
    pub req_id: Option<String>,
    pub new_sz: Option<String>,
    pub new_tp_trigger_px: Option<String>,
    pub new_tp_ord_px: Option<String>,
    pub new_sl_trigger_px: Option<String>,
    pub new_sl_ord_px: Option<String>,
    pub new_tp_trigger_px_type: Option<TriggerPriceType>,
    pub new_sl_trigger_px_type: Option<TriggerPriceType>,
}

/// Filters for `GET /okx/algo-trading/orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlgoOrdersQuery {
    pub ord_type: Option<AlgoOrderType>,
    pub algo_id: Option<String>,
    pub inst_id: Option<String>,
    pub inst_type: Option<InstType>,
    pub state: Option<AlgoOrderState>,
    pub limit: Option<u32>,
}

// ─── Acknowledgements ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AlgoAck {
    #[serde(default)]
    pub algo_id: String,
    #[serde(default)]
    pub algo_cl_ord_id: String,
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AmendAlgoAck {
    #[serde(default)]
    pub algo_id: String,
    #[serde(default)]
    pub algo_cl_ord_id: String,
    #[serde(default)]
    pub req_id: String,
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}

impl OkxAck for AlgoAck {
    fn status(&self) -> (&str, &str) {
        (&self.s_code, &self.s_msg)
    }

    fn set_status(&mut self, code: String, message: String) {
        self.s_code = code;
        self.s_msg = message;
    }
}

impl OkxAck for AmendAlgoAck {
    fn status(&self) -> (&str, &str) {
        (&self.s_code, &self.s_msg)
    }

    fn set_status(&mut self, code: String, message: String) {
        self.s_code = code;
        self.s_msg = message;
    }
}

impl Classify for AlgoAck {
    fn disposition(&self) -> Disposition {
        classify_okx(&self.s_code, &self.s_msg)
    }
}

impl Classify for AmendAlgoAck {
    fn disposition(&self) -> Disposition {
        classify_okx(&self.s_code, &self.s_msg)
    }
}

// ─── AlgoOrderRecord ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AlgoOrderRecord {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub algo_id: String,
    #[serde(default)]
    pub algo_cl_ord_id: String,
    #[serde(default)]
    pub ord_type: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub pos_side: String,
    #[serde(default)]
    pub td_mode: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub trigger_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub ord_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub tp_trigger_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub tp_ord_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sl_trigger_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sl_ord_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub callback_ratio: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub callback_spread: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub active_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub move_trigger_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub px_var: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub px_spread: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sz_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub px_limit: Option<Decimal>,
    #[serde(default)]
    pub time_interval: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub actual_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub actual_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub lever: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub c_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub trigger_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_base_deserializes() {
        let req: TrailingStopRequest = serde_json::from_value(serde_json::json!({
            "inst_id": "BTC-USDT-SWAP",
            "td_mode": "cross",
            "side": "sell",
            "sz": "1",
            "callback_ratio": "0.05"
        }))
        .unwrap();
        assert_eq!(req.base.inst_id, "BTC-USDT-SWAP");
        assert_eq!(req.base.td_mode, TradeMode::Cross);
        assert_eq!(req.callback_ratio.as_deref(), Some("0.05"));
    }

    #[test]
    fn test_algo_record_from_okx() {
        let rec: AlgoOrderRecord = serde_json::from_str(
            r#"{"instType":"SWAP","instId":"BTC-USDT-SWAP","algoId":"681096944655273984",
                "ordType":"move_order_stop","state":"live","sz":"1","callbackRatio":"0.05",
                "callbackSpread":"","activePx":"","cTime":"1708679675244","triggerTime":""}"#,
        )
        .unwrap();
        assert_eq!(rec.algo_id, "681096944655273984");
        assert!(rec.callback_spread.is_none());
        assert!(rec.trigger_time.is_none());
        assert!(rec.c_time.is_some());
    }

    #[test]
    fn test_state_pending_split() {
        assert!(AlgoOrderState::Live.is_pending());
        assert!(!AlgoOrderState::Effective.is_pending());
        let s: AlgoOrderState = serde_json::from_str("\"order_failed\"").unwrap();
        assert_eq!(s.as_str(), "order_failed");
    }
}
