//! Conversions: gateway requests → terminal `OrderRequest`s.

use super::{
    ClosePositionRequest, OrderRequest, PlaceOrderRequest, Position, ORDER_FILLING_IOC,
    ORDER_TIME_GTC, ORDER_TYPE_BUY, ORDER_TYPE_SELL, TRADE_ACTION_DEAL,
};
use crate::error::GatewayError;
use crate::shared::OrderSide;

fn order_type(side: OrderSide) -> u32 {
    match side {
        OrderSide::Buy => ORDER_TYPE_BUY,
        OrderSide::Sell => ORDER_TYPE_SELL,
    }
}

fn require_volume(volume: f64) -> Result<(), GatewayError> {
    if volume.is_finite() && volume > 0.0 {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "volume must be a positive number, got {volume}"
        )))
    }
}

impl PlaceOrderRequest {
    /// A market DEAL in the requested direction.
    pub fn to_order_request(&self) -> Result<OrderRequest, GatewayError> {
        if self.symbol.trim().is_empty() {
            return Err(GatewayError::Validation("symbol is required".to_string()));
        }
        require_volume(self.volume)?;
        Ok(OrderRequest {
            action: TRADE_ACTION_DEAL,
            symbol: self.symbol.clone(),
            volume: self.volume,
            kind: order_type(self.side),
            price: self.price,
            sl: self.sl,
            tp: self.tp,
            deviation: self.deviation,
            magic: self.magic,
            comment: self.comment.clone(),
            type_time: ORDER_TIME_GTC,
            type_filling: ORDER_FILLING_IOC,
            position: None,
        })
    }
}

impl ClosePositionRequest {
    /// An opposite DEAL against `position`, for all of it unless a volume is given.
    pub fn to_order_request(&self, position: &Position) -> Result<OrderRequest, GatewayError> {
        let volume = self.volume.unwrap_or(position.volume);
        require_volume(volume)?;
        if volume > position.volume {
            return Err(GatewayError::Validation(format!(
                "volume {volume} exceeds position volume {}",
                position.volume
            )));
        }
        Ok(OrderRequest {
            action: TRADE_ACTION_DEAL,
            symbol: position.symbol.clone(),
            volume,
            kind: order_type(position.side().opposite()),
            price: (position.price_current > 0.0).then_some(position.price_current),
            sl: None,
            tp: None,
            deviation: self.deviation,
            magic: position.magic,
            comment: Some(format!("close #{}", position.ticket)),
            type_time: ORDER_TIME_GTC,
            type_filling: ORDER_FILLING_IOC,
            position: Some(position.ticket),
        })
    }
}
