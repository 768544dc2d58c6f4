//! MetaTrader 5 terminal access.
//!
//! The terminal only exposes a native desktop API, so the gateway talks to it
//! through a [`Terminal`] implementation. [`BridgeTerminal`] speaks JSON to a
//! local bridge process that forwards each call to the terminal unchanged.

pub mod bridge;
pub mod client;
mod convert;

pub use bridge::BridgeTerminal;
pub use client::Mt5;

use crate::error::GatewayError;
use crate::shared::OrderSide;
use crate::submit::{Classify, Disposition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ─── Terminal constants ──────────────────────────────────────────────────────

pub const TRADE_ACTION_DEAL: u32 = 1;
pub const ORDER_TYPE_BUY: u32 = 0;
pub const ORDER_TYPE_SELL: u32 = 1;
pub const ORDER_TIME_GTC: u32 = 0;
pub const ORDER_FILLING_IOC: u32 = 1;

pub const RETCODE_PLACED: u32 = 10008;
pub const RETCODE_DONE: u32 = 10009;

/// Requote, price changed, off quotes, too many requests, no connection.
pub const TRANSIENT_RETCODES: &[u32] = &[10004, 10020, 10021, 10024, 10031];

// ─── Terminal trait ──────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Deserialize)]
pub struct Mt5Credentials {
    pub login: u64,
    pub password: String,
    pub server: String,
}

impl std::fmt::Debug for Mt5Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt5Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

/// The subset of the terminal API the gateway needs.
#[async_trait]
pub trait Terminal: Send + Sync {
    async fn initialize(&self, credentials: &Mt5Credentials) -> Result<(), GatewayError>;

    /// `None` when the terminal has no logged-in account.
    async fn account_info(&self) -> Result<Option<AccountInfo>, GatewayError>;

    async fn positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, GatewayError>;

    async fn order_send(&self, request: &OrderRequest) -> Result<TradeResult, GatewayError>;
}

// ─── Terminal records ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountInfo {
    pub login: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub leverage: u32,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub equity: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub margin: f64,
    #[serde(default)]
    pub margin_free: f64,
    #[serde(default)]
    pub margin_level: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub ticket: u64,
    #[serde(default)]
    pub time: i64,
    pub symbol: String,
    /// `ORDER_TYPE_BUY` or `ORDER_TYPE_SELL`.
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(default)]
    pub magic: u64,
    pub volume: f64,
    #[serde(default)]
    pub price_open: f64,
    #[serde(default)]
    pub price_current: f64,
    #[serde(default)]
    pub sl: f64,
    #[serde(default)]
    pub tp: f64,
    #[serde(default)]
    pub swap: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub identifier: u64,
}

impl Position {
    pub fn side(&self) -> OrderSide {
        if self.kind == ORDER_TYPE_SELL {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }
}

/// The terminal's `MqlTradeRequest`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub action: u32,
    pub symbol: String,
    pub volume: f64,
    #[serde(rename = "type")]
    pub kind: u32,
    /// Omitted to let the bridge fill the current market price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    pub deviation: u32,
    pub magic: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub type_time: u32,
    pub type_filling: u32,
    /// Ticket of the position being closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

/// The terminal's `MqlTradeResult`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TradeResult {
    pub retcode: u32,
    #[serde(default)]
    pub deal: u64,
    #[serde(default)]
    pub order: u64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub request_id: u64,
}

impl Classify for TradeResult {
    fn disposition(&self) -> Disposition {
        match self.retcode {
            RETCODE_DONE | RETCODE_PLACED => Disposition::Accepted,
            code if TRANSIENT_RETCODES.contains(&code) => Disposition::Transient {
                code: code.to_string(),
                message: self.comment.clone(),
            },
            code => Disposition::Rejected {
                code: code.to_string(),
                message: self.comment.clone(),
            },
        }
    }
}

// ─── Gateway requests ────────────────────────────────────────────────────────

fn default_deviation() -> u32 {
    20
}

/// Body of `POST /mt5/trading/place-order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub volume: f64,
    pub side: OrderSide,
    pub price: Option<f64>,
    pub sl: Option<f64>,
    pub tp: Option<f64>,
    #[serde(default = "default_deviation")]
    pub deviation: u32,
    #[serde(default)]
    pub magic: u64,
    pub comment: Option<String>,
}

/// Body of `POST /mt5/position/close`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosePositionRequest {
    pub ticket: u64,
    /// Defaults to the whole position.
    pub volume: Option<f64>,
    #[serde(default = "default_deviation")]
    pub deviation: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(retcode: u32) -> TradeResult {
        TradeResult {
            retcode,
            comment: "comment".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_retcode_classification() {
        assert_eq!(result(10009).disposition(), Disposition::Accepted);
        assert_eq!(result(10008).disposition(), Disposition::Accepted);
        assert!(matches!(
            result(10004).disposition(),
            Disposition::Transient { code, .. } if code == "10004"
        ));
        assert!(matches!(
            result(10019).disposition(),
            Disposition::Rejected { code, message } if code == "10019" && message == "comment"
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Mt5Credentials {
            login: 1234,
            password: "hunter2".to_string(),
            server: "Demo".to_string(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("1234"));
    }

    #[test]
    fn test_place_request_defaults() {
        let req: PlaceOrderRequest =
            serde_json::from_str(r#"{"symbol":"EURUSD","volume":0.1,"side":"buy"}"#).unwrap();
        assert_eq!(req.deviation, 20);
        assert_eq!(req.magic, 0);
    }
}
