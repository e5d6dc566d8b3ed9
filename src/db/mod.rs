//! Database layer (profile document store).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::StoreError;
use async_trait::async_trait;

/// Document body: a JSON object of field name to value.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Durable document store holding profile records.
///
/// Each upsert is atomic per document and merges at field level: fields
/// present in the write replace stored values and every other stored field
/// is kept. Documents are never replaced wholesale.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn upsert(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Document,
    ) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, document_id: &str)
        -> Result<Option<Document>, StoreError>;
}
