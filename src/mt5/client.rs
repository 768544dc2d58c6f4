//! Shared MT5 handle: connection state plus retry-wrapped trading.

use super::{
    AccountInfo, ClosePositionRequest, Mt5Credentials, PlaceOrderRequest, Position, Terminal,
    TradeResult,
};
use crate::error::{GatewayError, HttpError};
use crate::http::RetryConfig;
use crate::submit::{submit_with_retry, Submission};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct Mt5 {
    terminal: Arc<dyn Terminal>,
    credentials: Option<Mt5Credentials>,
    submission_retry: RetryConfig,
    connected: AtomicBool,
}

impl Mt5 {
    pub fn new(terminal: Arc<dyn Terminal>, credentials: Option<Mt5Credentials>) -> Self {
        Self {
            terminal,
            credentials,
            submission_retry: RetryConfig::order_submission(),
            connected: AtomicBool::new(false),
        }
    }

    pub fn with_submission_retry(mut self, config: RetryConfig) -> Self {
        self.submission_retry = config;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Log the terminal into the configured account.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        let Some(credentials) = &self.credentials else {
            self.connected.store(false, Ordering::Release);
            return Err(GatewayError::NotConnected("MT5"));
        };
        let result = self.terminal.initialize(credentials).await;
        self.connected.store(result.is_ok(), Ordering::Release);
        match result {
            Ok(()) => {
                tracing::info!(
                    login = credentials.login,
                    server = %credentials.server,
                    "Connected to MT5"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "MT5 initialize failed");
                Err(e)
            }
        }
    }

    async fn ensure_connected(&self) -> Result<(), GatewayError> {
        if self.is_connected() {
            return Ok(());
        }
        self.connect()
            .await
            .map_err(|_| GatewayError::NotConnected("MT5"))
    }

    /// Drop the connected flag when the bridge stops answering, so health
    /// reflects it and the next call logs in again.
    fn track<T>(&self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        if let Err(e) = &result {
            if link_lost(e) && self.connected.swap(false, Ordering::AcqRel) {
                tracing::warn!(error = %e, "Lost connection to MT5 bridge");
            }
        }
        result
    }

    pub async fn account_info(&self) -> Result<Option<AccountInfo>, GatewayError> {
        self.ensure_connected().await?;
        self.track(self.terminal.account_info().await)
    }

    pub async fn positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, GatewayError> {
        self.ensure_connected().await?;
        self.track(self.terminal.positions(symbol).await)
    }

    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<Submission<TradeResult>, GatewayError> {
        let order = &request.to_order_request()?;
        self.ensure_connected().await?;
        let terminal = &self.terminal;
        let sent = submit_with_retry(&self.submission_retry, "mt5.place_order", || async move {
            terminal.order_send(order).await
        })
        .await;
        self.track(sent)
    }

    /// Close an open position by ticket; `NotFound` when no such position is open.
    pub async fn close_position(
        &self,
        request: &ClosePositionRequest,
    ) -> Result<Submission<TradeResult>, GatewayError> {
        self.ensure_connected().await?;
        let position = self
            .track(self.terminal.positions(None).await)?
            .into_iter()
            .find(|p| p.ticket == request.ticket)
            .ok_or_else(|| {
                GatewayError::NotFound(format!("Position {} not found", request.ticket))
            })?;
        let order = &request.to_order_request(&position)?;
        let terminal = &self.terminal;
        let sent = submit_with_retry(&self.submission_retry, "mt5.close_position", || async move {
            terminal.order_send(order).await
        })
        .await;
        self.track(sent)
    }
}

fn link_lost(err: &GatewayError) -> bool {
    matches!(
        err,
        GatewayError::Http(
            HttpError::Reqwest(_) | HttpError::Timeout | HttpError::MaxRetriesExceeded { .. }
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt5::{OrderRequest, ORDER_TYPE_BUY};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Terminal that answers `order_send` from a script of retcodes.
    struct ScriptedTerminal {
        retcodes: Mutex<Vec<u32>>,
        sends: AtomicU32,
        positions: Vec<Position>,
        down: AtomicBool,
    }

    impl ScriptedTerminal {
        fn new(retcodes: &[u32]) -> Arc<Self> {
            Arc::new(Self {
                retcodes: Mutex::new(retcodes.iter().rev().copied().collect()),
                sends: AtomicU32::new(0),
                positions: vec![Position {
                    ticket: 7,
                    symbol: "XAUUSD".to_string(),
                    kind: ORDER_TYPE_BUY,
                    volume: 1.0,
                    ..Default::default()
                }],
                down: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl Terminal for ScriptedTerminal {
        async fn initialize(&self, _: &Mt5Credentials) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn account_info(&self) -> Result<Option<AccountInfo>, GatewayError> {
            Ok(None)
        }

        async fn positions(&self, _: Option<&str>) -> Result<Vec<Position>, GatewayError> {
            if self.down.load(Ordering::SeqCst) {
                let refused = reqwest::get("http://127.0.0.1:9/positions_get")
                    .await
                    .unwrap_err();
                return Err(HttpError::from(refused).into());
            }
            Ok(self.positions.clone())
        }

        async fn order_send(&self, request: &OrderRequest) -> Result<TradeResult, GatewayError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            let retcode = self.retcodes.lock().unwrap().pop().unwrap_or(10009);
            Ok(TradeResult {
                retcode,
                volume: request.volume,
                comment: format!("retcode {retcode}"),
                ..Default::default()
            })
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryConfig::order_submission()
        }
    }

    fn mt5(terminal: Arc<ScriptedTerminal>) -> Mt5 {
        let creds = Mt5Credentials {
            login: 1,
            password: "p".to_string(),
            server: "Demo".to_string(),
        };
        Mt5::new(terminal, Some(creds)).with_submission_retry(fast_retry())
    }

    fn place() -> PlaceOrderRequest {
        serde_json::from_str(r#"{"symbol":"XAUUSD","volume":0.2,"side":"buy"}"#).unwrap()
    }

    #[tokio::test]
    async fn test_requote_is_retried() {
        let terminal = ScriptedTerminal::new(&[10004, 10009]);
        let mt5 = mt5(terminal.clone());
        let outcome = mt5.place_order(&place()).await.unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(terminal.sends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let terminal = ScriptedTerminal::new(&[10019]);
        let mt5 = mt5(terminal.clone());
        let outcome = mt5.place_order(&place()).await.unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(terminal.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_unknown_ticket_is_not_found() {
        let mt5 = mt5(ScriptedTerminal::new(&[]));
        let req = ClosePositionRequest {
            ticket: 99,
            volume: None,
            deviation: 20,
        };
        assert!(matches!(
            mt5.close_position(&req).await,
            Err(GatewayError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_close_known_ticket() {
        let mt5 = mt5(ScriptedTerminal::new(&[]));
        let req = ClosePositionRequest {
            ticket: 7,
            volume: Some(0.4),
            deviation: 20,
        };
        let outcome = mt5.close_position(&req).await.unwrap();
        assert_eq!(outcome.ack().volume, 0.4);
    }

    #[tokio::test]
    async fn test_without_credentials_is_not_connected() {
        let mt5 = Mt5::new(ScriptedTerminal::new(&[]), None);
        assert!(matches!(
            mt5.account_info().await,
            Err(GatewayError::NotConnected("MT5"))
        ));
    }

    #[tokio::test]
    async fn test_bridge_outage_clears_connected() {
        let terminal = ScriptedTerminal::new(&[]);
        let mt5 = mt5(terminal.clone());
        mt5.connect().await.unwrap();
        assert!(mt5.is_connected());

        terminal.down.store(true, Ordering::SeqCst);
        assert!(mt5.positions(None).await.is_err());
        assert!(!mt5.is_connected());

        terminal.down.store(false, Ordering::SeqCst);
        assert_eq!(mt5.positions(None).await.unwrap().len(), 1);
        assert!(mt5.is_connected());
    }

    #[tokio::test]
    async fn test_rejection_keeps_connected() {
        let mt5 = mt5(ScriptedTerminal::new(&[10019]));
        mt5.connect().await.unwrap();
        mt5.place_order(&place()).await.unwrap();
        assert!(mt5.is_connected());
    }
}
