//! Conversions: gateway requests → OKX bodies, with validation.

use super::wire::{AmendBody, AttachedAlgoBody, CancelBody, ClosePositionBody, OrderBody};
use super::{AmendOrderRequest, CancelOrderRequest, ClosePositionRequest, PlaceOrderRequest};
use crate::domain::{require_decimal, require_id, require_positive};
use crate::error::GatewayError;

impl PlaceOrderRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        require_positive("sz", &self.sz)?;
        if self.ord_type.needs_price() && self.px.is_none() {
            return Err(GatewayError::Validation(
                "px is required for limit-style orders".to_string(),
            ));
        }
        if let Some(px) = &self.px {
            require_decimal("px", px)?;
        }
        Ok(())
    }

    pub fn to_body(&self) -> Result<OrderBody<'_>, GatewayError> {
        self.validate()?;
        let attached = AttachedAlgoBody {
            tp_trigger_px: self.tp_trigger_px.as_deref(),
            tp_ord_px: self.tp_ord_px.as_deref(),
            tp_trigger_px_type: self.tp_trigger_px_type,
            sl_trigger_px: self.sl_trigger_px.as_deref(),
            sl_ord_px: self.sl_ord_px.as_deref(),
            sl_trigger_px_type: self.sl_trigger_px_type,
        };
        Ok(OrderBody {
            inst_id: &self.inst_id,
            td_mode: self.td_mode,
            side: self.side,
            ord_type: self.ord_type,
            sz: &self.sz,
            px: self.px.as_deref(),
            ccy: self.ccy.as_deref(),
            cl_ord_id: self.cl_ord_id.as_deref(),
            tag: self.tag.as_deref(),
            pos_side: self.pos_side,
            reduce_only: self.reduce_only,
            tgt_ccy: self.tgt_ccy.as_deref(),
            quick_mgn_type: self.quick_mgn_type.as_deref(),
            stp_id: self.stp_id.as_deref(),
            stp_mode: self.stp_mode.as_deref(),
            ban_amend: self.ban_amend,
            attach_algo_ords: if attached.is_empty() {
                Vec::new()
            } else {
                vec![attached]
            },
        })
    }
}

impl CancelOrderRequest {
    pub fn to_body(&self) -> Result<CancelBody<'_>, GatewayError> {
        require_id("ord_id", "cl_ord_id", &self.ord_id, &self.cl_ord_id)?;
        Ok(CancelBody {
            inst_id: &self.inst_id,
            ord_id: self.ord_id.as_deref(),
            cl_ord_id: self.cl_ord_id.as_deref(),
        })
    }
}

impl AmendOrderRequest {
    pub fn to_body(&self) -> Result<AmendBody<'_>, GatewayError> {
        require_id("ord_id", "cl_ord_id", &self.ord_id, &self.cl_ord_id)?;
        if self.new_sz.is_none() && self.new_px.is_none() {
            return Err(GatewayError::Validation(
                "Either new_sz or new_px must be provided".to_string(),
            ));
        }
        if let Some(sz) = &self.new_sz {
            require_positive("new_sz", sz)?;
        }
        if let Some(px) = &self.new_px {
            require_decimal("new_px", px)?;
        }
        Ok(AmendBody {
            inst_id: &self.inst_id,
            ord_id: self.ord_id.as_deref(),
            cl_ord_id: self.cl_ord_id.as_deref(),
            req_id: self.req_id.as_deref(),
            new_sz: self.new_sz.as_deref(),
            new_px: self.new_px.as_deref(),
            cxl_on_fail: self.cxl_on_fail,
        })
    }
}

impl<'a> From<&'a ClosePositionRequest> for ClosePositionBody<'a> {
    fn from(req: &'a ClosePositionRequest) -> Self {
        ClosePositionBody {
            inst_id: &req.inst_id,
            mgn_mode: req.mgn_mode,
            pos_side: req.pos_side,
            ccy: req.ccy.as_deref(),
            auto_cxl: req.auto_cxl,
            cl_ord_id: req.cl_ord_id.as_deref(),
            tag: req.tag.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::OrderType;

    fn market_buy() -> PlaceOrderRequest {
        serde_json::from_value(serde_json::json!({
            "inst_id": "BTC-USDT",
            "side": "buy",
            "sz": "0.01"
        }))
        .unwrap()
    }

    #[test]
    fn test_order_body_is_camel_case() {
        let req = market_buy();
        let body = serde_json::to_value(req.to_body().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "instId": "BTC-USDT",
                "tdMode": "cash",
                "side": "buy",
                "ordType": "market",
                "sz": "0.01"
            })
        );
    }

    #[test]
    fn test_tp_sl_become_attached_algo() {
        let mut req = market_buy();
        req.tp_trigger_px = Some("70000".into());
        req.tp_ord_px = Some("-1".into());
        let body = serde_json::to_value(req.to_body().unwrap()).unwrap();
        assert_eq!(body["attachAlgoOrds"][0]["tpTriggerPx"], "70000");
        assert_eq!(body["attachAlgoOrds"][0]["tpOrdPx"], "-1");
        assert!(body["attachAlgoOrds"][0].get("slTriggerPx").is_none());
    }

    #[test]
    fn test_limit_without_price_rejected() {
        let mut req = market_buy();
        req.ord_type = OrderType::Limit;
        assert!(matches!(req.to_body(), Err(GatewayError::Validation(_))));
        req.px = Some("25000".into());
        assert!(req.to_body().is_ok());
    }

    #[test]
    fn test_bad_size_rejected() {
        let mut req = market_buy();
        req.sz = "lots".into();
        assert!(matches!(req.validate(), Err(GatewayError::Validation(_))));
        req.sz = "0".into();
        assert!(matches!(req.validate(), Err(GatewayError::Validation(_))));
    }

    #[test]
    fn test_cancel_needs_an_id() {
        let req = CancelOrderRequest {
            inst_id: "BTC-USDT".into(),
            ord_id: None,
            cl_ord_id: None,
        };
        assert!(req.to_body().is_err());
    }

    #[test]
    fn test_amend_needs_a_change() {
        let req = AmendOrderRequest {
            inst_id: "BTC-USDT".into(),
            ord_id: Some("1".into()),
            cl_ord_id: None,
            req_id: None,
            new_sz: None,
            new_px: None,
            cxl_on_fail: None,
        };
        assert!(req.to_body().is_err());
    }

    #[test]
    fn test_close_body() {
        let req: ClosePositionRequest = serde_json::from_value(serde_json::json!({
            "inst_id": "BTC-USDT-SWAP",
            "pos_side": "long"
        }))
        .unwrap();
        let body = serde_json::to_value(ClosePositionBody::from(&req)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"instId": "BTC-USDT-SWAP", "mgnMode": "cross", "posSide": "long"})
        );
    }
}
