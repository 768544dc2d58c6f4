//! MongoDB-backed message store.

use super::{MessageStore, COLLECTION};
use crate::discord::{DiscordMessage, StoredGroup};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime, Document};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// On-disk shape: native ObjectId and BSON date.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroupDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    timestamp: String,
    username: String,
    messages: Vec<DiscordMessage>,
    discord_channel_id: String,
    target_user_id: String,
    created_at: BsonDateTime,
}

impl From<StoredGroup> for GroupDocument {
    fn from(g: StoredGroup) -> Self {
        GroupDocument {
            id: None,
            timestamp: g.timestamp,
            username: g.username,
            messages: g.messages,
            discord_channel_id: g.discord_channel_id,
            target_user_id: g.target_user_id,
            created_at: BsonDateTime::from_millis(g.created_at.timestamp_millis()),
        }
    }
}

impl From<GroupDocument> for StoredGroup {
    fn from(d: GroupDocument) -> Self {
        StoredGroup {
            id: d.id.map(|oid| oid.to_hex()),
            timestamp: d.timestamp,
            username: d.username,
            messages: d.messages,
            discord_channel_id: d.discord_channel_id,
            target_user_id: d.target_user_id,
            created_at: DateTime::<Utc>::from_timestamp_millis(d.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
    groups: Collection<GroupDocument>,
}

impl MongoStore {
    pub async fn connect(url: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(database);
        let groups = db.collection::<GroupDocument>(COLLECTION);
        tracing::info!(database, collection = COLLECTION, "MongoDB client ready");
        Ok(Self { db, groups })
    }
}

fn count_field(doc: &Document, key: &str) -> u64 {
    match doc.get(key) {
        Some(Bson::Int32(n)) => *n as u64,
        Some(Bson::Int64(n)) => *n as u64,
        _ => 0,
    }
}

#[async_trait]
impl MessageStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let indexes = [
            doc! { "messages.message_id": 1 },
            doc! { "created_at": 1 },
            doc! { "discord_channel_id": 1, "target_user_id": 1 },
            doc! { "timestamp": 1 },
        ]
        .into_iter()
        .map(|keys| IndexModel::builder().keys(keys).build());
        self.groups.create_indexes(indexes).await?;
        tracing::info!(collection = COLLECTION, "Indexes ensured");
        Ok(())
    }

    async fn existing_message_ids(&self, ids: &[String]) -> Result<HashSet<String>, StoreError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let filter = doc! { "messages.message_id": { "$in": ids.to_vec() } };
        let pipeline = [
            doc! { "$match": filter.clone() },
            doc! { "$unwind": "$messages" },
            doc! { "$match": filter },
            doc! { "$group": {
                "_id": Bson::Null,
                "existing_ids": { "$addToSet": "$messages.message_id" },
            } },
        ];
        let mut cursor = self.groups.aggregate(pipeline).await?;
        let Some(result) = cursor.try_next().await? else {
            return Ok(HashSet::new());
        };
        let existing = result
            .get_array("existing_ids")
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(existing
            .iter()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect())
    }

    async fn insert_group(&self, group: StoredGroup) -> Result<String, StoreError> {
        let result = self.groups.insert_one(GroupDocument::from(group)).await?;
        result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| StoreError::Malformed("inserted id is not an ObjectId".to_string()))
    }

    async fn latest(&self, limit: u32) -> Result<Vec<StoredGroup>, StoreError> {
        let docs: Vec<GroupDocument> = self
            .groups
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(i64::from(limit))
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(StoredGroup::from).collect())
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, StoreError> {
        let pipeline = [
            doc! { "$match": { "target_user_id": user_id } },
            doc! { "$unwind": "$messages" },
            doc! { "$count": "total_messages" },
        ];
        let mut cursor = self.groups.aggregate(pipeline).await?;
        Ok(cursor
            .try_next()
            .await?
            .map(|doc| count_field(&doc, "total_messages"))
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip_keeps_time_and_id() {
        let created_at = DateTime::<Utc>::from_timestamp_millis(1_709_287_200_123).unwrap();
        let stored = StoredGroup {
            id: None,
            timestamp: "01/03/2024 10:00".to_string(),
            username: "trader".to_string(),
            messages: vec![],
            discord_channel_id: "chan".to_string(),
            target_user_id: "7".to_string(),
            created_at,
        };
        let mut doc = GroupDocument::from(stored);
        let oid = ObjectId::new();
        doc.id = Some(oid);
        let back = StoredGroup::from(doc);
        assert_eq!(back.created_at, created_at);
        assert_eq!(back.id, Some(oid.to_hex()));
    }

    #[test]
    fn test_count_field_accepts_both_widths() {
        assert_eq!(count_field(&doc! { "n": 3_i32 }, "n"), 3);
        assert_eq!(count_field(&doc! { "n": 4_i64 }, "n"), 4);
        assert_eq!(count_field(&doc! {}, "n"), 0);
    }
}
