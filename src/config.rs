//! Typed configuration read from the process environment.
//!
//! Both binaries call [`load_dotenv`] first, so a local `.env` file can supply
//! anything not already exported. Empty values count as unset.

use crate::auth::OkxCredentials;
use crate::error::ConfigError;
use crate::mt5::Mt5Credentials;
use crate::network::{
    DEFAULT_DISCORD_API_URL, DEFAULT_DISCORD_PORT, DEFAULT_MT5_BRIDGE_URL, DEFAULT_OKX_URL,
    DEFAULT_TRADING_PORT,
};
use crate::notify::TelegramTarget;
use std::str::FromStr;

/// Load `.env` if present; a missing file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
        }
    }
}

/// Environment lookup, swappable in tests.
struct Env<F> {
    get: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn opt(&self, key: &'static str) -> Option<String> {
        (self.get)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &'static str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.opt(key).ok_or(ConfigError::Missing(key))
    }

    fn parse<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.opt(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &'static str) -> Result<bool, ConfigError> {
        match self.opt(key) {
            None => Ok(false),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::Invalid { key, value }),
            },
        }
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// ─── Trading API ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TradingConfig {
    pub mt5: Option<Mt5Credentials>,
    pub mt5_bridge_url: String,
    pub okx: Option<OkxCredentials>,
    pub okx_sandbox: bool,
    pub okx_base_url: String,
    pub telegram: Option<TelegramTarget>,
    pub discord_webhook: Option<String>,
    pub host: String,
    pub port: u16,
}

impl TradingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { get };

        let mt5 = match (env.opt("MT5_LOGIN"), env.opt("MT5_PASSWORD"), env.opt("MT5_SERVER")) {
            (Some(login), Some(password), Some(server)) => Some(Mt5Credentials {
                login: login.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "MT5_LOGIN",
                    value: login.clone(),
                })?,
                password,
                server,
            }),
            _ => None,
        };

        let okx = match (
            env.opt("OKX_API_KEY"),
            env.opt("OKX_SECRET_KEY"),
            env.opt("OKX_PASSPHRASE"),
        ) {
            (Some(key), Some(secret), Some(passphrase)) => {
                Some(OkxCredentials::new(key, secret, passphrase))
            }
            _ => None,
        };

        let telegram = match (env.opt("TELEGRAM_BOT_TOKEN"), env.opt("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramTarget { bot_token, chat_id }),
            _ => None,
        };

        Ok(Self {
            mt5,
            mt5_bridge_url: env.or("MT5_BRIDGE_URL", DEFAULT_MT5_BRIDGE_URL),
            okx,
            okx_sandbox: env.flag("OKX_IS_SANDBOX")?,
            okx_base_url: env.or("OKX_BASE_URL", DEFAULT_OKX_URL),
            telegram,
            discord_webhook: env.opt("DISCORD_WEBHOOK_URL"),
            host: env.or("TRADING_HOST", "0.0.0.0"),
            port: env.parse("TRADING_PORT", DEFAULT_TRADING_PORT)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─── Discord harvester ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DiscordConfig {
    pub user_token: Option<String>,
    pub channel_id: Option<String>,
    pub target_user_id: Option<String>,
    pub fetch_interval_secs: u64,
    pub fetch_limit: u32,
    pub api_url: String,
    pub mongodb_url: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("user_token", &self.user_token.as_ref().map(|_| "<redacted>"))
            .field("channel_id", &self.channel_id)
            .field("target_user_id", &self.target_user_id)
            .field("fetch_interval_secs", &self.fetch_interval_secs)
            .field("fetch_limit", &self.fetch_limit)
            .field("api_url", &self.api_url)
            .field("mongodb_db", &self.mongodb_db)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl DiscordConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { get };
        let fetch_interval_secs = env.parse("DISCORD_FETCH_INTERVAL_SECS", 60u64)?;
        if fetch_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "DISCORD_FETCH_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }
        Ok(Self {
            user_token: env.opt("DISCORD_USER_TOKEN"),
            channel_id: env.opt("DISCORD_CHANNEL_ID"),
            target_user_id: env.opt("TARGET_USER_ID"),
            fetch_interval_secs,
            fetch_limit: env.parse("DISCORD_FETCH_LIMIT", 100u32)?,
            api_url: env.or("DISCORD_API_URL", DEFAULT_DISCORD_API_URL),
            mongodb_url: env.required("MONGODB_URL")?,
            mongodb_db: env.or("MONGODB_DB", "trading_bot"),
            host: env.or("DISCORD_HOST", "0.0.0.0"),
            port: env.parse("DISCORD_PORT", DEFAULT_DISCORD_PORT)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_trading_defaults() {
        let cfg = TradingConfig::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.mt5.is_none());
        assert!(cfg.okx.is_none());
        assert!(!cfg.okx_sandbox);
        assert_eq!(cfg.port, 3002);
        assert_eq!(cfg.okx_base_url, "https://www.okx.com");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3002");
    }

    #[test]
    fn test_trading_full() {
        let cfg = TradingConfig::from_lookup(lookup(&[
            ("MT5_LOGIN", "5012345"),
            ("MT5_PASSWORD", "pw"),
            ("MT5_SERVER", "Broker-Demo"),
            ("OKX_API_KEY", "k"),
            ("OKX_SECRET_KEY", "s"),
            ("OKX_PASSPHRASE", "p"),
            ("OKX_IS_SANDBOX", "True"),
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("TRADING_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(cfg.mt5.unwrap().login, 5012345);
        assert!(cfg.okx.is_some());
        assert!(cfg.okx_sandbox);
        assert_eq!(cfg.telegram.unwrap().chat_id, "42");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn test_empty_counts_as_unset() {
        let cfg = TradingConfig::from_lookup(lookup(&[
            ("OKX_API_KEY", ""),
            ("OKX_SECRET_KEY", "s"),
            ("OKX_PASSPHRASE", "p"),
        ]))
        .unwrap();
        assert!(cfg.okx.is_none());
    }

    #[test]
    fn test_bad_port_is_invalid() {
        let err = TradingConfig::from_lookup(lookup(&[("TRADING_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TRADING_PORT", .. }));
    }

    #[test]
    fn test_discord_requires_mongodb_url() {
        let err = DiscordConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MONGODB_URL")));

        let cfg = DiscordConfig::from_lookup(lookup(&[("MONGODB_URL", "mongodb://localhost")]))
            .unwrap();
        assert_eq!(cfg.fetch_interval_secs, 60);
        assert_eq!(cfg.fetch_limit, 100);
        assert_eq!(cfg.mongodb_db, "trading_bot");
        assert_eq!(cfg.port, 3001);
    }
}
