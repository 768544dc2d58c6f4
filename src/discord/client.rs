//! Discord REST fetcher.

use super::wire::RawMessage;
use crate::error::{GatewayError, HttpError};
use crate::network::DEFAULT_DISCORD_API_URL;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DiscordHttp {
    api_url: String,
    client: Client,
}

impl DiscordHttp {
    pub fn new(api_url: Option<&str>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(HttpError::from)?;
        Ok(Self {
            api_url: api_url
                .unwrap_or(DEFAULT_DISCORD_API_URL)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// One page of channel history, newest first.
    ///
    /// A non-200 answer is logged and yields `Ok(None)`.
    pub async fn fetch_messages(
        &self,
        token: &str,
        channel_id: &str,
        limit: u32,
    ) -> Result<Option<Vec<RawMessage>>, GatewayError> {
        let url = format!(
            "{}/channels/{}/messages",
            self.api_url,
            urlencoding::encode(channel_id)
        );
        let resp = self
            .client
            .get(&url)
            .header("Authorization", token)
            .header("User-Agent", "Mozilla/5.0")
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(HttpError::from)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                %channel_id,
                body = %body,
                "Discord fetch failed"
            );
            return Ok(None);
        }

        let messages: Vec<RawMessage> = resp.json().await.map_err(HttpError::from)?;
        tracing::info!(count = messages.len(), %channel_id, "Fetched Discord messages");
        Ok(Some(messages))
    }
}
