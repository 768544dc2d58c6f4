//! Conversions: algo placement requests → `AlgoOrderBody`, with validation.

use super::wire::{AlgoOrderBody, AmendAlgoBody, CancelAlgoBody};
use super::{
    AlgoOrderBase, AlgoOrderType, AmendAlgoRequest, CancelAlgoRequest, IcebergRequest,
    TpSlRequest, TrailingStopRequest, TriggerRequest, TwapRequest,
};
use crate::domain::trade::wire::AttachedAlgoBody;
use crate::domain::{require_decimal, require_id, require_positive};
use crate::error::GatewayError;

fn exactly_one(
    a_name: &str,
    b_name: &str,
    a: &Option<String>,
    b: &Option<String>,
) -> Result<(), GatewayError> {
    match (a, b) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(GatewayError::Validation(format!(
            "Exactly one of {a_name} or {b_name} must be provided"
        ))),
    }
}

impl AlgoOrderBase {
    fn body(&self, ord_type: AlgoOrderType) -> Result<AlgoOrderBody<'_>, GatewayError> {
        require_positive("sz", &self.sz)?;
        Ok(AlgoOrderBody {
            inst_id: &self.inst_id,
            td_mode: self.td_mode,
            side: self.side,
            ord_type,
            sz: &self.sz,
            pos_side: self.pos_side,
            reduce_only: self.reduce_only,
            tgt_ccy: self.tgt_ccy.as_deref(),
            algo_cl_ord_id: self.algo_cl_ord_id.as_deref(),
            tag: self.tag.as_deref(),
            ccy: self.ccy.as_deref(),
            tp_trigger_px: None,
            tp_ord_px: None,
            tp_trigger_px_type: None,
            sl_trigger_px: None,
            sl_ord_px: None,
            sl_trigger_px_type: None,
            trigger_px: None,
            order_px: None,
            trigger_px_type: None,
            attach_algo_ords: Vec::new(),
            callback_ratio: None,
            callback_spread: None,
            active_px: None,
            px_var: None,
            px_spread: None,
            sz_limit: None,
            px_limit: None,
            time_interval: None,
        })
    }
}

impl TpSlRequest {
    /// One leg → `conditional`; both legs → `oco`.
    pub fn to_body(&self) -> Result<AlgoOrderBody<'_>, GatewayError> {
        let ord_type = match (&self.tp_trigger_px, &self.sl_trigger_px) {
            (Some(_), Some(_)) => AlgoOrderType::Oco,
            (Some(_), None) | (None, Some(_)) => AlgoOrderType::Conditional,
            (None, None) => {
                return Err(GatewayError::Validation(
                    "At least one of tp_trigger_px or sl_trigger_px must be provided".to_string(),
                ))
            }
        };
        for (name, px) in [
            ("tp_trigger_px", &self.tp_trigger_px),
            ("tp_ord_px", &self.tp_ord_px),
            ("sl_trigger_px", &self.sl_trigger_px),
            ("sl_ord_px", &self.sl_ord_px),
        ] {
            if let Some(px) = px {
                require_decimal(name, px)?;
            }
        }
        let mut body = self.base.body(ord_type)?;
        body.tp_trigger_px = self.tp_trigger_px.as_deref();
        body.tp_ord_px = self
            .tp_trigger_px
            .as_ref()
            .map(|_| self.tp_ord_px.as_deref().unwrap_or("-1"));
        body.tp_trigger_px_type = self.tp_trigger_px_type;
        body.sl_trigger_px = self.sl_trigger_px.as_deref();
        body.sl_ord_px = self
            .sl_trigger_px
            .as_ref()
            .map(|_| self.sl_ord_px.as_deref().unwrap_or("-1"));
        body.sl_trigger_px_type = self.sl_trigger_px_type;
        Ok(body)
    }
}

impl TriggerRequest {
    pub fn to_body(&self) -> Result<AlgoOrderBody<'_>, GatewayError> {
        require_positive("trigger_px", &self.trigger_px)?;
        require_decimal("order_px", &self.order_px)?;
        let mut body = self.base.body(AlgoOrderType::Trigger)?;
        body.trigger_px = Some(&self.trigger_px);
        body.order_px = Some(&self.order_px);
        body.trigger_px_type = self.trigger_px_type;
        let attached = AttachedAlgoBody {
            tp_trigger_px: self.tp_trigger_px.as_deref(),
            tp_ord_px: self.tp_ord_px.as_deref(),
            sl_trigger_px: self.sl_trigger_px.as_deref(),
            sl_ord_px: self.sl_ord_px.as_deref(),
            ..Default::default()
        };
        if !attached.is_empty() {
            body.attach_algo_ords.push(attached);
        }
        Ok(body)
    }
}

impl TrailingStopRequest {
    pub fn to_body(&self) -> Result<AlgoOrderBody<'_>, GatewayError> {
        exactly_one(
            "callback_ratio",
            "callback_spread",
            &self.callback_ratio,
            &self.callback_spread,
        )?;
        let mut body = self.base.body(AlgoOrderType::MoveOrderStop)?;
        body.callback_ratio = self.callback_ratio.as_deref();
        body.callback_spread = self.callback_spread.as_deref();
        body.active_px = self.active_px.as_deref();
        Ok(body)
    }
}

impl IcebergRequest {
    pub fn to_body(&self) -> Result<AlgoOrderBody<'_>, GatewayError> {
        exactly_one("px_var", "px_spread", &self.px_var, &self.px_spread)?;
        require_positive("sz_limit", &self.sz_limit)?;
        require_positive("px_limit", &self.px_limit)?;
        let mut body = self.base.body(AlgoOrderType::Iceberg)?;
        body.px_var = self.px_var.as_deref();
        body.px_spread = self.px_spread.as_deref();
        body.sz_limit = Some(&self.sz_limit);
        body.px_limit = Some(&self.px_limit);
        Ok(body)
    }
}

impl TwapRequest {
    pub fn to_body(&self) -> Result<AlgoOrderBody<'_>, GatewayError> {
        exactly_one("px_var", "px_spread", &self.px_var, &self.px_spread)?;
        require_positive("sz_limit", &self.sz_limit)?;
        require_positive("px_limit", &self.px_limit)?;
        require_positive("time_interval", &self.time_interval)?;
        let mut body = self.base.body(AlgoOrderType::Twap)?;
        body.px_var = self.px_var.as_deref();
        body.px_spread = self.px_spread.as_deref();
        body.sz_limit = Some(&self.sz_limit);
        body.px_limit = Some(&self.px_limit);
        body.time_interval = Some(&self.time_interval);
        Ok(body)
    }
}

impl<'a> From<&'a CancelAlgoRequest> for CancelAlgoBody<'a> {
    fn from(req: &'a CancelAlgoRequest) -> Self {
        CancelAlgoBody {
            inst_id: &req.inst_id,
            algo_id: &req.algo_id,
        }
    }
}

impl AmendAlgoRequest {
    pub fn to_body(&self) -> Result<AmendAlgoBody<'_>, GatewayError> {
        require_id("algo_id", "algo_cl_ord_id", &self.algo_id, &self.algo_cl_ord_id)?;
        Ok(AmendAlgoBody {
            inst_id: &self.inst_id,
            algo_id: self.algo_id.as_deref(),
            algo_cl_ord_id: self.algo_cl_ord_id.as_deref(),
            cxl_on_fail: self.cxl_on_fail,
            req_id: self.req_id.as_deref(),
            new_sz: self.new_sz.as_deref(),
            new_tp_trigger_px: self.new_tp_trigger_px.as_deref(),
            new_tp_ord_px: self.new_tp_ord_px.as_deref(),
            new_sl_trigger_px: self.new_sl_trigger_px.as_deref(),
            new_sl_ord_px: self.new_sl_ord_px.as_deref(),
            new_tp_trigger_px_type: self.new_tp_trigger_px_type,
            new_sl_trigger_px_type: self.new_sl_trigger_px_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> serde_json::Value {
        json!({"inst_id": "BTC-USDT-SWAP", "td_mode": "cross", "side": "sell", "sz": "2"})
    }

    fn with(extra: serde_json::Value) -> serde_json::Value {
        let mut v = base();
        for (k, val) in extra.as_object().unwrap() {
            v[k] = val.clone();
        }
        v
    }

    #[test]
    fn test_tp_sl_one_leg_is_conditional() {
        let req: TpSlRequest =
            serde_json::from_value(with(json!({"sl_trigger_px": "58000"}))).unwrap();
        let body = serde_json::to_value(req.to_body().unwrap()).unwrap();
        assert_eq!(body["ordType"], "conditional");
        assert_eq!(body["slTriggerPx"], "58000");
        assert_eq!(body["slOrdPx"], "-1");
        assert!(body.get("tpTriggerPx").is_none());
    }

    #[test]
    fn test_tp_sl_both_legs_is_oco() {
        let req: TpSlRequest = serde_json::from_value(with(
            json!({"tp_trigger_px": "72000", "tp_ord_px": "71900", "sl_trigger_px": "58000"}),
        ))
        .unwrap();
        let body = serde_json::to_value(req.to_body().unwrap()).unwrap();
        assert_eq!(body["ordType"], "oco");
        assert_eq!(body["tpOrdPx"], "71900");
    }

    #[test]
    fn test_tp_sl_needs_a_leg() {
        let req: TpSlRequest = serde_json::from_value(base()).unwrap();
        assert!(matches!(req.to_body(), Err(GatewayError::Validation(_))));
    }

    #[test]
    fn test_trigger_attaches_tp() {
        let req: TriggerRequest = serde_json::from_value(with(
            json!({"trigger_px": "60000", "order_px": "-1", "tp_trigger_px": "65000"}),
        ))
        .unwrap();
        let body = serde_json::to_value(req.to_body().unwrap()).unwrap();
        assert_eq!(body["ordType"], "trigger");
        assert_eq!(body["orderPx"], "-1");
        assert_eq!(body["attachAlgoOrds"][0]["tpTriggerPx"], "65000");
    }

    #[test]
    fn test_trailing_stop_exactly_one_callback() {
        let both: TrailingStopRequest = serde_json::from_value(with(
            json!({"callback_ratio": "0.05", "callback_spread": "100"}),
        ))
        .unwrap();
        assert!(both.to_body().is_err());

        let neither: TrailingStopRequest = serde_json::from_value(base()).unwrap();
        assert!(neither.to_body().is_err());

        let ratio: TrailingStopRequest =
            serde_json::from_value(with(json!({"callback_ratio": "0.05", "active_px": "61000"})))
                .unwrap();
        let body = serde_json::to_value(ratio.to_body().unwrap()).unwrap();
        assert_eq!(body["ordType"], "move_order_stop");
        assert_eq!(body["activePx"], "61000");
    }

    #[test]
    fn test_twap_body() {
        let req: TwapRequest = serde_json::from_value(with(json!({
            "px_spread": "10", "sz_limit": "0.5", "px_limit": "60000", "time_interval": "30"
        })))
        .unwrap();
        let body = serde_json::to_value(req.to_body().unwrap()).unwrap();
        assert_eq!(body["ordType"], "twap");
        assert_eq!(body["timeInterval"], "30");
        assert!(body.get("pxVar").is_none());
    }

    #[test]
    fn test_iceberg_requires_px_var_or_spread() {
        let req: IcebergRequest =
            serde_json::from_value(with(json!({"sz_limit": "0.5", "px_limit": "60000"}))).unwrap();
        assert!(req.to_body().is_err());
    }

    #[test]
    fn test_amend_needs_id() {
        let req: AmendAlgoRequest =
            serde_json::from_value(json!({"inst_id": "BTC-USDT", "new_sz": "3"})).unwrap();
        assert!(req.to_body().is_err());
    }
}
