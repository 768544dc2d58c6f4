//! Route tables for both services.

mod discord;
mod mt5;
mod notifications;
mod okx_account;
mod okx_algo;
mod okx_market;
mod okx_trading;

use super::state::{DiscordState, TradingState};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// `/okx/*`, `/mt5/*`, `/notifications/*` and `/health`.
pub fn trading_router(state: TradingState) -> Router {
    Router::new()
        .route("/", get(trading_root))
        .route("/health", get(trading_health))
        .nest("/okx/trading", okx_trading::routes())
        .nest("/okx/algo-trading", okx_algo::routes())
        .nest("/okx/market", okx_market::routes())
        .nest("/okx/account", okx_account::routes())
        .nest("/mt5", mt5::routes())
        .nest("/notifications", notifications::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `/discord/*` and `/health`.
pub fn discord_router(state: DiscordState) -> Router {
    Router::new()
        .route("/", get(discord_root))
        .route("/health", get(discord_health))
        .nest("/discord", discord::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn link_status(connected: bool) -> &'static str {
    if connected {
        "connected"
    } else {
        "disconnected"
    }
}

async fn trading_root() -> Json<Value> {
    Json(json!({ "message": "Trading API is running", "status": "running" }))
}

async fn trading_health(State(state): State<TradingState>) -> Json<Value> {
    let mt5 = state.mt5.is_connected();
    let okx = state.okx.is_connected();
    Json(json!({
        "status": if mt5 || okx { "healthy" } else { "unhealthy" },
        "service": "trading",
        "services": {
            "mt5": link_status(mt5),
            "okx": link_status(okx),
        },
    }))
}

async fn discord_root() -> Json<Value> {
    Json(json!({ "message": "Discord Bot Service is running", "status": "running" }))
}

async fn discord_health(State(state): State<DiscordState>) -> Json<Value> {
    let running = state.scheduler.is_running();
    Json(json!({
        "status": if running { "healthy" } else { "unhealthy" },
        "service": "discord-bot",
        "discord_scheduler": if running { "running" } else { "stopped" },
    }))
}
