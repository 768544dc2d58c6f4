//! Conversions: raw channel page → [`DiscordData`].

use super::wire::{RawAttachment, RawMessage};
use super::{
    DiscordData, DiscordMessage, MessageGroup, ReplyTo, Timespan, EXPORT_LIMIT, GROUP_WINDOW_SECS,
    TIME_FORMAT,
};
use chrono::{DateTime, Utc};

fn format_time(ts: DateTime<Utc>) -> String {
    ts.format(TIME_FORMAT).to_string()
}

fn attachment_urls(attachments: &[RawAttachment]) -> Vec<String> {
    attachments.iter().filter_map(|a| a.url.clone()).collect()
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Trimmed content, else the first embed's description or title.
fn message_content(msg: &RawMessage) -> String {
    let content = msg.content.trim();
    if !content.is_empty() {
        return content.to_string();
    }
    msg.embeds
        .iter()
        .find_map(|e| non_empty(&e.description).or_else(|| non_empty(&e.title)))
        .unwrap_or_default()
}

fn to_message(msg: &RawMessage) -> DiscordMessage {
    let reply_to = msg
        .message_reference
        .as_ref()
        .and(msg.referenced_message.as_deref())
        .map(|replied| ReplyTo {
            message_id: replied.id.clone(),
            author: replied.author.username.clone(),
            content: replied.content.trim().to_string(),
            attachments: attachment_urls(&replied.attachments),
        });
    DiscordMessage {
        message_id: msg.id.clone(),
        content: message_content(msg),
        attachments: attachment_urls(&msg.attachments),
        reply_to,
    }
}

fn to_group(group_id: u32, messages: &[&RawMessage]) -> MessageGroup {
    let first = messages[0];
    MessageGroup {
        group_id,
        timestamp: format_time(first.timestamp),
        username: first.author.username.clone(),
        messages: messages.iter().map(|m| to_message(m)).collect(),
    }
}

/// Walk newest → oldest; a message joins the current group when it is within
/// the window of that group's last message.
pub fn group_by_time(messages: &[&RawMessage]) -> Vec<MessageGroup> {
    let mut groups = Vec::new();
    let mut current: Vec<&RawMessage> = Vec::new();

    for &msg in messages {
        if let Some(last) = current.last() {
            let gap_ms = (last.timestamp - msg.timestamp).num_milliseconds().abs();
            if gap_ms > GROUP_WINDOW_SECS * 1000 {
                groups.push(to_group(groups.len() as u32 + 1, &current));
                current.clear();
            }
        }
        current.push(msg);
    }
    if !current.is_empty() {
        groups.push(to_group(groups.len() as u32 + 1, &current));
    }
    groups
}

/// Keep `target_user_id`'s messages from a channel page and group the newest.
///
/// `None` when the user has no messages in the page.
pub fn build_discord_data(
    raw: &[RawMessage],
    channel_id: &str,
    target_user_id: &str,
) -> Option<DiscordData> {
    let mut mine: Vec<&RawMessage> = raw
        .iter()
        .filter(|m| m.author.id == target_user_id)
        .collect();
    if mine.is_empty() {
        return None;
    }
    mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total_messages = mine.len();
    let exported: Vec<&RawMessage> = mine.into_iter().take(EXPORT_LIMIT).collect();
    let newest = exported[0];
    let oldest = exported[exported.len() - 1];

    Some(DiscordData {
        username: newest.author.username.clone(),
        total_messages,
        exported_count: exported.len(),
        timespan: Timespan {
            from: format_time(oldest.timestamp),
            to: format_time(newest.timestamp),
        },
        message_groups: group_by_time(&exported),
        created_at: Utc::now(),
        discord_channel_id: channel_id.to_string(),
        target_user_id: target_user_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: &str, author: &str, ts: &str, content: &str) -> serde_json::Value {
        json!({
            "id": id,
            "author": {"id": author, "username": format!("user{author}")},
            "content": content,
            "timestamp": ts,
        })
    }

    fn parse(values: Vec<serde_json::Value>) -> Vec<RawMessage> {
        serde_json::from_value(serde_json::Value::Array(values)).unwrap()
    }

    #[test]
    fn test_no_target_messages_is_none() {
        let page = parse(vec![raw("1", "9", "2024-03-01T10:00:00.000000+00:00", "hi")]);
        assert!(build_discord_data(&page, "c", "7").is_none());
    }

    #[test]
    fn test_grouping_by_five_minutes() {
        let page = parse(vec![
            raw("1", "7", "2024-03-01T10:00:00+00:00", "oldest"),
            raw("2", "7", "2024-03-01T10:20:00+00:00", "a"),
            raw("3", "7", "2024-03-01T10:24:00+00:00", "b"),
            raw("4", "7", "2024-03-01T10:29:00+00:00", "c"),
            raw("5", "8", "2024-03-01T10:30:00+00:00", "someone else"),
        ]);
        let data = build_discord_data(&page, "chan", "7").unwrap();
        assert_eq!(data.total_messages, 4);
        assert_eq!(data.username, "user7");
        assert_eq!(data.message_groups.len(), 2);

        let first = &data.message_groups[0];
        assert_eq!(first.group_id, 1);
        assert_eq!(first.timestamp, "01/03/2024 10:29");
        let ids: Vec<&str> = first.messages.iter().map(|m| m.message_id.as_str()).collect();
        assert_eq!(ids, ["4", "3", "2"]);

        assert_eq!(data.message_groups[1].group_id, 2);
        assert_eq!(data.timespan.from, "01/03/2024 10:00");
        assert_eq!(data.timespan.to, "01/03/2024 10:29");
    }

    #[test]
    fn test_export_keeps_ten_newest() {
        let page = parse(
            (0..15)
                .map(|i| {
                    raw(
                        &i.to_string(),
                        "7",
                        &format!("2024-03-01T10:{:02}:00+00:00", i),
                        "x",
                    )
                })
                .collect(),
        );
        let data = build_discord_data(&page, "chan", "7").unwrap();
        assert_eq!(data.total_messages, 15);
        assert_eq!(data.exported_count, 10);
        assert_eq!(data.message_groups[0].messages[0].message_id, "14");
    }

    #[test]
    fn test_embed_fallback_and_reply() {
        let page = parse(vec![json!({
            "id": "10",
            "author": {"id": "7", "username": "trader"},
            "content": "   ",
            "timestamp": "2024-03-01T10:00:00+00:00",
            "embeds": [{"title": "Signal"}, {"description": "ignored"}],
            "attachments": [{"url": "https://cdn/x.png"}, {}],
            "message_reference": {"message_id": "9"},
            "referenced_message": {
                "id": "9",
                "author": {"id": "3", "username": "mod"},
                "content": " buy gold ",
                "timestamp": "2024-03-01T09:59:00+00:00"
            }
        })]);
        let data = build_discord_data(&page, "chan", "7").unwrap();
        let msg = &data.message_groups[0].messages[0];
        assert_eq!(msg.content, "Signal");
        assert_eq!(msg.attachments, ["https://cdn/x.png"]);
        let reply = msg.reply_to.as_ref().unwrap();
        assert_eq!(reply.author, "mod");
        assert_eq!(reply.content, "buy gold");
    }
}
