//! # venue-gateway
//!
//! A REST gateway over the OKX v5 API and a MetaTrader 5 terminal, plus a
//! Discord harvester that stores one trader's signal messages.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: shared enums, venue domain models, errors
//! 2. **Auth**: OKX request signing
//! 3. **Transport**: `OkxHttp` with retry policies, and the retry-wrapped submission core
//! 4. **Venues**: `OkxClient` with nested sub-clients, `Mt5` over a terminal bridge
//! 5. **Services**: notifications, Discord harvesting, the axum routers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use venue_gateway::prelude::*;
//!
//! let okx = OkxClient::builder()
//!     .credentials(OkxCredentials::new(key, secret, passphrase))
//!     .sandbox(true)
//!     .build()?;
//! okx.connect().await?;
//!
//! let ticker = okx.market().ticker("BTC-USDT").await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared enums used across the OKX domains.
pub mod shared;

/// OKX domain modules: types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified gateway error types.
pub mod error;

/// Venue URL and port constants.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// OKX API credentials and request signing.
pub mod auth;

// ── Layer 3: Transport ───────────────────────────────────────────────────────

/// OKX HTTP client with retry policies.
pub mod http;

/// Retry-wrapped order submission shared by every venue.
pub mod submit;

// ── Layer 4: Venues ──────────────────────────────────────────────────────────

/// `OkxClient`, the OKX entry point.
pub mod client;

/// MetaTrader 5 through a terminal bridge.
pub mod mt5;

// ── Layer 5: Services ────────────────────────────────────────────────────────

pub mod notify;

/// Discord message harvesting and persistence.
pub mod discord;

pub mod config;

pub mod logging;

/// axum routers, state and error mapping.
pub mod server;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared enums
    pub use crate::shared::{
        InstType, MarginMode, OrderSide, PositionSide, TradeMode, TriggerPriceType,
    };

    // Domain types: trading
    pub use crate::domain::trade::{
        AmendOrderRequest, CancelOrderRequest, ClosePositionRequest, OrderAck, OrderRecord,
        OrderType, PlaceOrderRequest,
    };

    // Domain types: algo orders
    pub use crate::domain::algo::{
        AlgoAck, AlgoOrderRecord, AlgoOrderState, AlgoOrderType, AlgoOrdersQuery,
    };

    // Domain types: market + account
    pub use crate::domain::account::{AccountBalance, PositionMode};
    pub use crate::domain::market::{Bar, Candle, CandleQuery, OrderBook, Ticker};

    // Errors
    pub use crate::error::{ConfigError, GatewayError, HttpError, StoreError};

    // Auth + clients
    pub use crate::auth::OkxCredentials;
    pub use crate::client::{OkxClient, OkxClientBuilder};
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
    pub use crate::mt5::{BridgeTerminal, Mt5, Mt5Credentials, Terminal};

    // Submission core
    pub use crate::submit::{Classify, Disposition, Submission};

    // Services
    pub use crate::discord::{Harvester, MessageStore, Scheduler};
    pub use crate::notify::{Notifier, NotifyReport};
    pub use crate::server::{discord_router, trading_router, DiscordState, TradingState};
}
