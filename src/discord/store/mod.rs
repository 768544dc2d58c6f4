//! Persistence for harvested message groups.

mod memory;
#[cfg(feature = "mongo")]
mod mongo;

pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

use super::StoredGroup;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Collection that holds one document per message group.
pub const COLLECTION: &str = "trading_signals";

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn ensure_indexes(&self) -> Result<(), StoreError>;

    /// The subset of `ids` already stored in some group.
    async fn existing_message_ids(&self, ids: &[String]) -> Result<HashSet<String>, StoreError>;

    /// Insert a group and return its id.
    async fn insert_group(&self, group: StoredGroup) -> Result<String, StoreError>;

    /// Newest groups first, by `created_at`.
    async fn latest(&self, limit: u32) -> Result<Vec<StoredGroup>, StoreError>;

    /// Messages (not groups) stored for a user.
    async fn count_by_user(&self, user_id: &str) -> Result<u64, StoreError>;
}
