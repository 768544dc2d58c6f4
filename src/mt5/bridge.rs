//! JSON-over-HTTP terminal bridge.

use super::{AccountInfo, Mt5Credentials, OrderRequest, Position, Terminal, TradeResult};
use crate::error::{GatewayError, HttpError};
use crate::http::client::status_error;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Talks to a bridge process sitting next to the terminal.
///
/// | method         | route                      |
/// |----------------|----------------------------|
/// | `initialize`   | `POST /initialize`         |
/// | `account_info` | `GET /account_info`        |
/// | `positions`    | `GET /positions_get?symbol`|
/// | `order_send`   | `POST /order_send`         |
#[derive(Debug, Clone)]
pub struct BridgeTerminal {
    base_url: String,
    client: Client,
}

impl BridgeTerminal {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(HttpError::from)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, GatewayError> {
        let resp = req.send().await.map_err(HttpError::from)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), body).into());
        }
        Ok(resp.json::<T>().await.map_err(HttpError::from)?)
    }
}

#[async_trait]
impl Terminal for BridgeTerminal {
    async fn initialize(&self, credentials: &Mt5Credentials) -> Result<(), GatewayError> {
        let ok: bool = self
            .send(self.client.post(self.url("/initialize")).json(credentials))
            .await?;
        if ok {
            Ok(())
        } else {
            Err(GatewayError::NotConnected("MT5"))
        }
    }

    async fn account_info(&self) -> Result<Option<AccountInfo>, GatewayError> {
        self.send(self.client.get(self.url("/account_info"))).await
    }

    async fn positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, GatewayError> {
        let mut req = self.client.get(self.url("/positions_get"));
        if let Some(symbol) = symbol {
            req = req.query(&[("symbol", symbol)]);
        }
        let positions: Option<Vec<Position>> = self.send(req).await?;
        Ok(positions.unwrap_or_default())
    }

    async fn order_send(&self, request: &OrderRequest) -> Result<TradeResult, GatewayError> {
        self.send(self.client.post(self.url("/order_send")).json(request))
            .await
    }
}
