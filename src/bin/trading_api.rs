//! OKX + MT5 trading gateway.

use std::sync::Arc;
use venue_gateway::client::OkxClient;
use venue_gateway::config::{load_dotenv, TradingConfig};
use venue_gateway::error::GatewayError;
use venue_gateway::logging;
use venue_gateway::mt5::{BridgeTerminal, Mt5};
use venue_gateway::notify::Notifier;
use venue_gateway::server::{self, TradingState};

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    load_dotenv();
    logging::init();

    let config = TradingConfig::from_env()?;
    tracing::info!(
        addr = %config.bind_addr(),
        sandbox = config.okx_sandbox,
        "Starting trading API"
    );

    let mut okx = OkxClient::builder()
        .base_url(&config.okx_base_url)
        .sandbox(config.okx_sandbox);
    if let Some(credentials) = config.okx.clone() {
        okx = okx.credentials(credentials);
    }
    let okx = okx.build()?;

    let terminal = BridgeTerminal::new(&config.mt5_bridge_url)?;
    let mt5 = Mt5::new(Arc::new(terminal), config.mt5.clone());
    let notifier = Notifier::new(config.telegram.clone(), config.discord_webhook.clone())?;

    // Either venue may be down at boot; the server starts regardless.
    match okx.connect().await {
        Ok(()) => tracing::info!("OKX connection established"),
        Err(e) => tracing::warn!(error = %e, "OKX unavailable at startup"),
    }
    match mt5.connect().await {
        Ok(()) => tracing::info!("MT5 connection established"),
        Err(e) => tracing::warn!(error = %e, "MT5 unavailable at startup"),
    }

    let state = TradingState::new(okx, mt5, notifier);
    let app = server::trading_router(state.clone());
    server::serve(&config.bind_addr(), app).await?;

    state.okx.disconnect();
    tracing::info!("Trading API shut down");
    Ok(())
}
