//! Network URL constants for the venues the gateway talks to.

/// OKX REST API base URL (production and demo trading share it).
pub const DEFAULT_OKX_URL: &str = "https://www.okx.com";

/// Discord REST API base URL.
pub const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Telegram Bot API base URL.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default address of the local MT5 terminal bridge.
pub const DEFAULT_MT5_BRIDGE_URL: &str = "http://127.0.0.1:18812";

/// Default listen port of the trading API.
pub const DEFAULT_TRADING_PORT: u16 = 3002;

/// Default listen port of the Discord harvester.
pub const DEFAULT_DISCORD_PORT: u16 = 3001;
