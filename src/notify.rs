//! Best-effort trade notifications to Telegram and a Discord webhook.

use crate::error::{GatewayError, HttpError};
use crate::http::client::status_error;
use crate::network::TELEGRAM_API_URL;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct TelegramTarget {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramTarget")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Per-channel delivery result; `None` for a channel that is not configured.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifyReport {
    pub telegram: Option<bool>,
    pub discord: Option<bool>,
}

#[derive(Clone)]
pub struct Notifier {
    client: Client,
    telegram: Option<TelegramTarget>,
    discord_webhook: Option<String>,
    telegram_api_url: String,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("telegram", &self.telegram)
            .field(
                "discord_webhook",
                &self.discord_webhook.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(
        telegram: Option<TelegramTarget>,
        discord_webhook: Option<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(HttpError::from)?;
        Ok(Self {
            client,
            telegram,
            discord_webhook,
            telegram_api_url: TELEGRAM_API_URL.to_string(),
        })
    }

    /// Point Telegram calls somewhere other than the public Bot API.
    pub fn with_telegram_api_url(mut self, url: &str) -> Self {
        self.telegram_api_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.telegram.is_some() || self.discord_webhook.is_some()
    }

    /// Deliver to every configured channel. Failures are logged, never returned.
    pub async fn send(&self, title: &str, body: &str) -> NotifyReport {
        let telegram = async {
            match &self.telegram {
                Some(target) => {
                    let sent = self.send_telegram(target, title, body).await;
                    Some(log_outcome("telegram", sent))
                }
                None => None,
            }
        };
        let discord = async {
            match &self.discord_webhook {
                Some(url) => {
                    let sent = self.send_discord(url, title, body).await;
                    Some(log_outcome("discord", sent))
                }
                None => None,
            }
        };
        let (telegram, discord) = futures_util::join!(telegram, discord);
        NotifyReport { telegram, discord }
    }

    async fn send_telegram(
        &self,
        target: &TelegramTarget,
        title: &str,
        body: &str,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.telegram_api_url, target.bot_token
        );
        let payload = json!({
            "chat_id": target.chat_id,
            "text": format!("<b>{}</b>\n{}", escape_html(title), escape_html(body)),
            "parse_mode": "HTML",
        });
        self.post(&url, &payload).await
    }

    async fn send_discord(&self, url: &str, title: &str, body: &str) -> Result<(), GatewayError> {
        let payload = json!({ "content": format!("**{title}**\n{body}") });
        self.post(url, &payload).await
    }

    /// Both target URLs embed a token, so it is stripped from transport errors.
    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| HttpError::from(e.without_url()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), body).into())
    }
}

fn log_outcome(channel: &'static str, result: Result<(), GatewayError>) -> bool {
    match result {
        Ok(()) => {
            tracing::debug!(channel, "Notification delivered");
            true
        }
        Err(e) => {
            tracing::warn!(channel, error = %e, "Notification failed");
            false
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_reports_nothing() {
        let notifier = Notifier::new(None, None).unwrap();
        assert!(!notifier.is_configured());
        assert_eq!(notifier.send("t", "b").await, NotifyReport::default());
    }

    #[tokio::test]
    async fn test_unreachable_webhook_reports_failure() {
        let notifier =
            Notifier::new(None, Some("http://127.0.0.1:9/webhook".to_string())).unwrap();
        let report = notifier.send("Order filled", "BTC-USDT buy 1").await;
        assert_eq!(report.discord, Some(false));
        assert_eq!(report.telegram, None);
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_carry_tokens() {
        let target = TelegramTarget {
            bot_token: "123:SUPERSECRET".to_string(),
            chat_id: "42".to_string(),
        };
        let webhook = "http://127.0.0.1:9/api/webhooks/1/HOOKSECRET".to_string();
        let notifier = Notifier::new(Some(target.clone()), Some(webhook.clone()))
            .unwrap()
            .with_telegram_api_url("http://127.0.0.1:9");

        let err = notifier.send_telegram(&target, "t", "b").await.unwrap_err();
        assert!(matches!(err, GatewayError::Http(HttpError::Reqwest(_))));
        assert!(!err.to_string().contains("SUPERSECRET"));

        let err = notifier.send_discord(&webhook, "t", "b").await.unwrap_err();
        assert!(!err.to_string().contains("HOOKSECRET"));

        assert!(!format!("{notifier:?}").contains("HOOKSECRET"));
        assert!(!format!("{notifier:?}").contains("SUPERSECRET"));
    }

    #[test]
    fn test_telegram_debug_redacts_token() {
        let target = TelegramTarget {
            bot_token: "123:secret".to_string(),
            chat_id: "42".to_string(),
        };
        assert!(!format!("{target:?}").contains("secret"));
    }
}
