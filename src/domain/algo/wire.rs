//! Outbound bodies for `/api/v5/trade/order-algo` and friends.

use super::AlgoOrderType;
use crate::domain::trade::wire::AttachedAlgoBody;
use crate::shared::{OrderSide, PositionSide, TradeMode, TriggerPriceType};
use serde::Serialize;

/// One body shape for every algo placement; unset strategy fields are omitted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlgoOrderBody<'a> {
    pub inst_id: &'a str,
    pub td_mode: TradeMode,
    pub side: OrderSide,
    pub ord_type: AlgoOrderType,
    pub sz: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<PositionSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tgt_ccy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algo_cl_ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccy: Option<&'a str>,

    // conditional / oco
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_trigger_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_ord_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_trigger_px_type: Option<TriggerPriceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_trigger_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_ord_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_trigger_px_type: Option<TriggerPriceType>,

    // trigger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_px_type: Option<TriggerPriceType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attach_algo_ords: Vec<AttachedAlgoBody<'a>>,

    // move_order_stop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_ratio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_spread: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_px: Option<&'a str>,

    // iceberg / twap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px_var: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px_spread: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sz_limit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px_limit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_interval: Option<&'a str>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelAlgoBody<'a> {
    pub inst_id: &'a str,
    pub algo_id: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmendAlgoBody<'a> {
    pub inst_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algo_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algo_cl_ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cxl_on_fail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_sz: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tp_trigger_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tp_ord_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_sl_trigger_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_sl_ord_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tp_trigger_px_type: Option<TriggerPriceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_sl_trigger_px_type: Option<TriggerPriceType>,
}
