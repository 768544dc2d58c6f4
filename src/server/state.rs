//! Shared handler state for both services.

use crate::client::OkxClient;
use crate::discord::{Harvester, Scheduler};
use crate::mt5::Mt5;
use crate::notify::Notifier;
use std::sync::Arc;

#[derive(Clone)]
pub struct TradingState {
    pub okx: Arc<OkxClient>,
    pub mt5: Arc<Mt5>,
    pub notifier: Arc<Notifier>,
}

impl TradingState {
    pub fn new(okx: OkxClient, mt5: Mt5, notifier: Notifier) -> Self {
        Self {
            okx: Arc::new(okx),
            mt5: Arc::new(mt5),
            notifier: Arc::new(notifier),
        }
    }

    /// Fire-and-forget notification; the response never waits on it.
    pub fn notify(&self, title: impl Into<String>, body: impl Into<String>) {
        if !self.notifier.is_configured() {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        let (title, body) = (title.into(), body.into());
        tokio::spawn(async move {
            notifier.send(&title, &body).await;
        });
    }
}

#[derive(Clone)]
pub struct DiscordState {
    pub harvester: Arc<Harvester>,
    pub scheduler: Arc<Scheduler>,
}
