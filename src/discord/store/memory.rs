//! In-process store for tests and database-less runs.

use super::MessageStore;
use crate::discord::StoredGroup;
use crate::error::StoreError;
use async_lock::RwLock;
use async_trait::async_trait;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: RwLock<Vec<StoredGroup>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.groups.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.groups.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn existing_message_ids(&self, ids: &[String]) -> Result<HashSet<String>, StoreError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(self
            .groups
            .read()
            .await
            .iter()
            .flat_map(|g| g.messages.iter())
            .filter(|m| wanted.contains(m.message_id.as_str()))
            .map(|m| m.message_id.clone())
            .collect())
    }

    async fn insert_group(&self, mut group: StoredGroup) -> Result<String, StoreError> {
        let mut groups = self.groups.write().await;
        let id = format!("{:024x}", groups.len() + 1);
        group.id = Some(id.clone());
        groups.push(group);
        Ok(id)
    }

    async fn latest(&self, limit: u32) -> Result<Vec<StoredGroup>, StoreError> {
        let mut groups = self.groups.read().await.clone();
        // Ties: most recent insert first.
        groups.reverse();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        groups.truncate(limit as usize);
        Ok(groups)
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, StoreError> {
        Ok(self
            .groups
            .read()
            .await
            .iter()
            .filter(|g| g.target_user_id == user_id)
            .map(|g| g.messages.len() as u64)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::DiscordMessage;
    use chrono::{Duration, Utc};

    fn group(user: &str, ids: &[&str], age_secs: i64) -> StoredGroup {
        StoredGroup {
            id: None,
            timestamp: "01/03/2024 10:00".to_string(),
            username: "trader".to_string(),
            messages: ids
                .iter()
                .map(|id| DiscordMessage {
                    message_id: id.to_string(),
                    content: String::new(),
                    attachments: vec![],
                    reply_to: None,
                })
                .collect(),
            discord_channel_id: "chan".to_string(),
            target_user_id: user.to_string(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn test_existing_ids_and_counts() {
        let store = MemoryStore::new();
        store.insert_group(group("7", &["1", "2"], 10)).await.unwrap();
        store.insert_group(group("8", &["3"], 5)).await.unwrap();

        let existing = store
            .existing_message_ids(&["2".to_string(), "3".to_string(), "4".to_string()])
            .await
            .unwrap();
        assert_eq!(existing.len(), 2);
        assert!(!existing.contains("4"));

        assert_eq!(store.count_by_user("7").await.unwrap(), 2);
        assert_eq!(store.count_by_user("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latest_is_newest_first() {
        let store = MemoryStore::new();
        store.insert_group(group("7", &["old"], 100)).await.unwrap();
        store.insert_group(group("7", &["new"], 1)).await.unwrap();
        let latest = store.latest(1).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].messages[0].message_id, "new");
        assert!(latest[0].id.is_some());
    }
}
