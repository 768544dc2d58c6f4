//! Discord REST message shapes, reduced to the fields the harvester reads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawAuthor {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawEmbed {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawAttachment {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawReference {
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawMessage {
    pub id: String,
    pub author: RawAuthor,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub embeds: Vec<RawEmbed>,
    #[serde(default)]
    pub attachments: Vec<RawAttachment>,
    pub message_reference: Option<RawReference>,
    /// Present (possibly null) on replies.
    pub referenced_message: Option<Box<RawMessage>>,
}
