//! HTTP surface: axum routers for the trading and Discord services.
//!
//! ```rust,ignore
//! let app = server::trading_router(state);
//! server::serve(&config.bind_addr(), app).await?;
//! ```

pub mod error;
pub mod extract;
mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::OptionalJson;
pub use routes::{discord_router, trading_router};
pub use state::{DiscordState, TradingState};

use crate::error::GatewayError;
use serde::Serialize;
use tokio::net::TcpListener;

// ─── Response envelope ───────────────────────────────────────────────────────

/// `{"status":"success", ...}` wrapper shared by the read endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            count: None,
            message: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            count: Some(count),
            ..Self::data(data)
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            data: None,
            count: None,
            message: Some(message.into()),
        }
    }
}

// ─── Serving ─────────────────────────────────────────────────────────────────

/// Bind and serve until ctrl-c.
pub async fn serve(addr: &str, app: axum::Router) -> Result<(), GatewayError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Other(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!(addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Other(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
