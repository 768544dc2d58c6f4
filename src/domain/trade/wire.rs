//! Outbound bodies for `/api/v5/trade/*`.

use crate::shared::{MarginMode, OrderSide, PositionSide, TradeMode, TriggerPriceType};
use serde::Serialize;

use super::OrderType;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody<'a> {
    pub inst_id: &'a str,
    pub td_mode: TradeMode,
    pub side: OrderSide,
    pub ord_type: OrderType,
    pub sz: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<PositionSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tgt_ccy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_mgn_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_amend: Option<bool>,
    /// Take-profit / stop-loss legs attached to the order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attach_algo_ords: Vec<AttachedAlgoBody<'a>>,
}

/// One TP/SL leg inside `attachAlgoOrds`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachedAlgoBody<'a> {
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
}

impl AttachedAlgoBody<'_> {
    pub fn is_empty(&self) -> bool {
        self.tp_trigger_px.is_none() && self.sl_trigger_px.is_none()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelBody<'a> {
    pub inst_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<&'a str>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmendBody<'a> {
    pub inst_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_sz: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_px: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cxl_on_fail: Option<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionBody<'a> {
    pub inst_id: &'a str,
    pub mgn_mode: MarginMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<PositionSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_cxl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
}
