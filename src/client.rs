//! High-level OKX client: `OkxClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the connection flag, and accessor methods.

use crate::auth::OkxCredentials;
use crate::domain::account::client::Account;
use crate::domain::algo::client::AlgoTrading;
use crate::domain::market::client::Market;
use crate::domain::trade::client::Trading;
use crate::error::GatewayError;
use crate::http::client::Query;
use crate::http::{OkxHttp, RetryConfig, RetryPolicy};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Re-export sub-client types for convenience.
pub use crate::domain::account::client::Account as AccountClient;
pub use crate::domain::algo::client::AlgoTrading as AlgoTradingClient;
pub use crate::domain::market::client::Market as MarketClient;
pub use crate::domain::trade::client::Trading as TradingClient;

/// The gateway's single shared handle to OKX.
///
/// Provides nested sub-client accessors for each domain:
/// `client.trading()`, `client.market()`, etc.
#[derive(Clone)]
pub struct OkxClient {
    pub(crate) http: OkxHttp,
    pub(crate) submission_retry: RetryConfig,
    connected: Arc<AtomicBool>,
}

impl OkxClient {
    pub fn builder() -> OkxClientBuilder {
        OkxClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn trading(&self) -> Trading<'_> {
        Trading { client: self }
    }

    pub fn algo(&self) -> AlgoTrading<'_> {
        AlgoTrading { client: self }
    }

    pub fn market(&self) -> Market<'_> {
        Market { client: self }
    }

    pub fn account(&self) -> Account<'_> {
        Account { client: self }
    }

    // ── Connection ───────────────────────────────────────────────────────

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn is_sandbox(&self) -> bool {
        self.http.is_simulated()
    }

    /// Verify the credentials by reading the account balance.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        if !self.http.has_credentials().await {
            self.connected.store(false, Ordering::Release);
            return Err(GatewayError::NotConnected("OKX"));
        }

        let result = self
            .http
            .get::<serde_json::Value>("/api/v5/account/balance", &Query::new())
            .await;

        let ok = result.is_ok();
        self.connected.store(ok, Ordering::Release);
        match result {
            Ok(_) => {
                tracing::info!(sandbox = self.is_sandbox(), "Connected to OKX");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "OKX credential check failed");
                Err(e)
            }
        }
    }

    /// Reconnect once if the last check failed.
    pub(crate) async fn ensure_connected(&self) -> Result<(), GatewayError> {
        if self.is_connected() {
            return Ok(());
        }
        self.connect()
            .await
            .map_err(|_| GatewayError::NotConnected("OKX"))
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct OkxClientBuilder {
    base_url: String,
    credentials: Option<OkxCredentials>,
    sandbox: bool,
    submission_retry: RetryConfig,
    read_retry: RetryPolicy,
}

impl Default for OkxClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_OKX_URL.to_string(),
            credentials: None,
            sandbox: false,
            submission_retry: RetryConfig::order_submission(),
            read_retry: RetryPolicy::Idempotent,
        }
    }
}

impl OkxClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn credentials(mut self, credentials: OkxCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Route requests to demo trading (`x-simulated-trading: 1`).
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Schedule for order placement retries.
    pub fn submission_retry(mut self, config: RetryConfig) -> Self {
        self.submission_retry = config;
        self
    }

    /// Schedule for transport retries on reads.
    pub fn read_retry(mut self, config: RetryConfig) -> Self {
        self.read_retry = RetryPolicy::Custom(config);
        self
    }

    pub fn build(self) -> Result<OkxClient, GatewayError> {
        let http = OkxHttp::new(&self.base_url, self.credentials, self.sandbox)?
            .with_read_retry(self.read_retry);
        Ok(OkxClient {
            http,
            submission_retry: self.submission_retry,
            connected: Arc::new(AtomicBool::new(false)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_without_credentials_fails_fast() {
        let client = OkxClient::builder().build().unwrap();
        assert!(matches!(
            client.connect().await,
            Err(GatewayError::NotConnected("OKX"))
        ));
        assert!(!client.is_connected());
    }

    #[test]
    fn test_builder_defaults() {
        let client = OkxClient::builder().sandbox(true).build().unwrap();
        assert!(client.is_sandbox());
        assert_eq!(client.http.base_url(), "https://www.okx.com");
        assert_eq!(client.submission_retry, RetryConfig::order_submission());
    }
}
