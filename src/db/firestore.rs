// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed profile store.
//!
//! Merge upserts are sent with an update mask naming exactly the written
//! fields, so Firestore keeps every other stored field.

use super::{Document, ProfileStore};
use crate::error::StoreError;
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        // Emulator connections skip credential discovery entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Backend(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return [`StoreError::Offline`].
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client.as_ref().ok_or(StoreError::Offline)
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    async fn upsert(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Document,
    ) -> Result<(), StoreError> {
        // Without a mask Firestore would replace the whole document.
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields.keys())
            .in_col(collection)
            .document_id(document_id)
            .object(fields)
            .execute()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(
            collection,
            document_id,
            fields = fields.len(),
            "Document upserted"
        );
        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let value: Option<serde_json::Value> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(document_id)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match value {
            None => Ok(None),
            Some(serde_json::Value::Object(doc)) => Ok(Some(doc)),
            Some(other) => Err(StoreError::Decode(format!(
                "expected a document object, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_is_offline() {
        let db = FirestoreDb::new_mock();

        let err = db
            .upsert("users", "u1", &Document::new())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Offline);

        let err = db.get("users", "u1").await.unwrap_err();
        assert_eq!(err, StoreError::Offline);
    }
}
