//! Trade domain: orders and position closes.

pub mod client;
mod convert;
pub mod wire;

use crate::domain::{classify_okx, OkxAck};
use crate::shared::serde_util::{decimal_opt, millis_opt};
use crate::shared::{InstType, MarginMode, OrderSide, PositionSide, TradeMode, TriggerPriceType};
use crate::submit::{Classify, Disposition};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── OrderType ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
    PostOnly,
    Fok,
    Ioc,
    OptimalLimitIoc,
}

impl OrderType {
    pub fn needs_price(&self) -> bool {
        matches!(
            self,
            OrderType::Limit | OrderType::PostOnly | OrderType::Fok | OrderType::Ioc
        )
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Body of `POST /okx/trading/place-order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceOrderRequest {
    pub inst_id: String,
    #[serde(default)]
    pub td_mode: TradeMode,
    pub side: OrderSide,
    #[serde(default)]
    pub ord_type: OrderType,
    pub sz: String,
    pub px: Option<String>,
    pub ccy: Option<String>,
    pub cl_ord_id: Option<String>,
    pub tag: Option<String>,
    pub pos_side: Option<PositionSide>,
    pub reduce_only: Option<bool>,
    pub tgt_ccy: Option<String>,
    pub tp_trigger_px: Option<String>,
    pub tp_ord_px: Option<String>,
    pub sl_trigger_px: Option<String>,
    pub sl_ord_px: Option<String>,
    pub tp_trigger_px_type: Option<TriggerPriceType>,
    pub sl_trigger_px_type: Option<TriggerPriceType>,
    pub quick_mgn_type: Option<String>,
    pub stp_id: Option<String>,
    pub stp_mode: Option<String>,
    pub ban_amend: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelOrderRequest {
    pub inst_id: String,
    pub ord_id: Option<String>,
    pub cl_ord_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmendOrderRequest {
    pub inst_id: String,
    pub ord_id: Option<String>,
    pub cl_ord_id: Option<String>,
    pub req_id: Option<String>,
    pub new_sz: Option<String>,
    pub new_px: Option<String>,
    pub cxl_on_fail: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosePositionRequest {
    pub inst_id: String,
    #[serde(default)]
    pub mgn_mode: MarginMode,
    pub pos_side: Option<PositionSide>,
    pub ccy: Option<String>,
    pub auto_cxl: Option<bool>,
    pub cl_ord_id: Option<String>,
    pub tag: Option<String>,
}

/// Filters for `GET /okx/trading/orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderHistoryQuery {
    #[serde(default)]
    pub inst_type: InstType,
    pub inst_id: Option<String>,
    pub state: Option<String>,
    pub limit: Option<u32>,
}

// ─── Acknowledgements ────────────────────────────────────────────────────────

/// Per-order answer to a placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct OrderAck {
    #[serde(default)]
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CancelAck {
    #[serde(default)]
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AmendAck {
    #[serde(default)]
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub req_id: String,
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}

/// Answer to `close-position`. OKX sends no per-item code here, so the
/// envelope's code is copied in; it drives classification only and is not
/// part of the response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CloseAck {
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub pos_side: String,
    #[serde(default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing)]
    pub s_code: String,
    #[serde(default, skip_serializing)]
    pub s_msg: String,
}

macro_rules! okx_ack {
    ($($ty:ty),+) => {$(
        impl OkxAck for $ty {
            fn status(&self) -> (&str, &str) {
                (&self.s_code, &self.s_msg)
            }

            fn set_status(&mut self, code: String, message: String) {
                self.s_code = code;
                self.s_msg = message;
            }
        }

        impl Classify for $ty {
            fn disposition(&self) -> Disposition {
                classify_okx(&self.s_code, &self.s_msg)
            }
        }
    )+};
}

okx_ack!(OrderAck, CancelAck, AmendAck, CloseAck);

// ─── OrderRecord ─────────────────────────────────────────────────────────────

/// An order as OKX reports it in history and detail queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct OrderRecord {
    #[serde(default)]
    pub inst_type: String,
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub sz: Option<Decimal>,
    #[serde(default)]
    pub ord_type: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub pos_side: String,
    #[serde(default)]
    pub td_mode: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub acc_fill_sz: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub fill_px: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub avg_px: Option<Decimal>,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub lever: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub fee_ccy: String,
    #[serde(default, deserialize_with = "decimal_opt::deserialize")]
    pub pnl: Option<Decimal>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub c_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "millis_opt::deserialize")]
    pub u_time: Option<DateTime<Utc>>,
}
