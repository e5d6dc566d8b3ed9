// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process profile store with field-level merge semantics.
//!
//! Useful for local runs without the Firestore emulator and as a test
//! double. Documents live only as long as the store.

use super::{Document, ProfileStore};
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory document store keyed by `(collection, document_id)`.
#[derive(Default)]
pub struct MemoryStore {
    documents: DashMap<(String, String), Document>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upserts applied so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn upsert(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Document,
    ) -> Result<(), StoreError> {
        let key = (collection.to_string(), document_id.to_string());

        // The entry guard holds the shard lock, so each merge is atomic.
        let mut doc = self.documents.entry(key).or_default();
        for (field, value) in fields {
            doc.insert(field.clone(), value.clone());
        }
        drop(doc);

        self.writes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(collection, document_id, "Document upserted (memory)");
        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let key = (collection.to_string(), document_id.to_string());
        Ok(self.documents.get(&key).map(|doc| doc.value().clone()))
    }
}
