//! Discord signal harvesting: fetch a channel, keep one user's messages,
//! group them by time and persist each group once.
//!
//! - `wire.rs`: Raw Discord REST message shapes
//! - `convert.rs`: Filtering, grouping and content extraction
//! - `client.rs`: `DiscordHttp`, the REST fetcher
//! - `store/`: `MessageStore` and its MongoDB / in-memory backends
//! - `harvester.rs`: `Harvester` (fetch + save) and the interval `Scheduler`

pub mod client;
pub mod convert;
pub mod harvester;
pub mod store;
pub mod wire;

pub use client::DiscordHttp;
pub use convert::build_discord_data;
pub use harvester::{Harvester, HarvesterDefaults, Scheduler};
pub use store::{MemoryStore, MessageStore};

#[cfg(feature = "mongo")]
pub use store::MongoStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format for group timestamps and timespans.
pub const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Messages this close to the previous one in a group join that group.
pub const GROUP_WINDOW_SECS: i64 = 5 * 60;

/// How many of the newest matching messages are exported per fetch.
pub const EXPORT_LIMIT: usize = 10;

// ─── Exported shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyTo {
    pub message_id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordMessage {
    pub message_id: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub reply_to: Option<ReplyTo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageGroup {
    pub group_id: u32,
    pub timestamp: String,
    pub username: String,
    pub messages: Vec<DiscordMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timespan {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordData {
    pub username: String,
    /// Matching messages in the fetched page.
    pub total_messages: usize,
    /// Messages actually exported (at most [`EXPORT_LIMIT`]).
    pub exported_count: usize,
    pub timespan: Timespan,
    pub message_groups: Vec<MessageGroup>,
    pub created_at: DateTime<Utc>,
    pub discord_channel_id: String,
    pub target_user_id: String,
}

// ─── Requests & results ──────────────────────────────────────────────────────

/// Body of the fetch endpoints; unset fields fall back to configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FetchRequest {
    pub discord_token: Option<String>,
    pub channel_id: Option<String>,
    pub target_user_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted_groups: usize,
    pub new_messages: usize,
}

/// One persisted group, as stored and as returned by `latest`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredGroup {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub timestamp: String,
    pub username: String,
    pub messages: Vec<DiscordMessage>,
    pub discord_channel_id: String,
    pub target_user_id: String,
    pub created_at: DateTime<Utc>,
}
