// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in operations that keep the profile document in step with the
//! identity provider.
//!
//! Every operation runs the provider step first and only writes the profile
//! once it succeeds:
//! - Registration and federated sign-in write the full profile shape
//!   (create-or-merge), including `signUpDate`.
//! - Email/password sign-in merges only `lastLogin`.
//!
//! A federated sign-in therefore resets `signUpDate` to the time of that
//! sign-in. Callers that need the original sign-up time must not rely on
//! `signUpDate` for federated accounts.

use crate::config::Config;
use crate::db::{collections, FirestoreDb, ProfileStore};
use crate::error::{AuthError, Result, StoreError};
use crate::models::{
    NameFields, ProfileRecord, ProfileSource, ProfileWrite, ProviderKind, UserCredential,
};
use crate::services::identity::{FederatedCredentialSource, IdentityProvider};
use crate::services::identity_toolkit::IdentityToolkitClient;
use crate::time_utils::{format_utc_iso8601, Clock, SystemClock};
use anyhow::Context;
use std::sync::Arc;

/// Reconciles identity-provider sessions with profile documents.
#[derive(Clone)]
pub struct Reconciler {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
    collection: String,
}

impl Reconciler {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn ProfileStore>) -> Self {
        Self {
            identity,
            store,
            clock: Arc::new(SystemClock),
            collection: collections::USERS.to_string(),
        }
    }

    /// Wire Identity Toolkit and Firestore from configuration.
    pub async fn from_config(
        config: &Config,
        federated: Option<Arc<dyn FederatedCredentialSource>>,
    ) -> anyhow::Result<Self> {
        let mut identity =
            IdentityToolkitClient::new(config).context("failed building Identity Toolkit client")?;
        if let Some(source) = federated {
            identity = identity.with_federated_source(source);
        }

        let store = FirestoreDb::new(&config.gcp_project_id)
            .await
            .context("failed connecting to Firestore")?;

        tracing::info!(
            project = %config.gcp_project_id,
            collection = %config.profile_collection,
            emulator = config.auth_emulator_host.is_some(),
            "Profile reconciler initialized"
        );

        Ok(Self::new(Arc::new(identity), Arc::new(store))
            .with_collection(config.profile_collection.clone()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    fn now(&self) -> String {
        format_utc_iso8601(self.clock.now())
    }

    // ─── Sign-in Operations ──────────────────────────────────────

    /// Register a new email/password account and create its profile.
    ///
    /// The display name is set to `"<first> <last>"` (trimmed) on the
    /// provider before the profile is written.
    pub async fn register_with_credentials(
        &self,
        email: &str,
        password: &str,
        names: &NameFields,
    ) -> Result<UserCredential> {
        let credential = self
            .identity
            .create_principal(email, password)
            .await
            .map_err(AuthError::Registration)?;

        let credential = self
            .identity
            .update_display_name(&credential, &names.display_name())
            .await
            .map_err(AuthError::Registration)?;

        self.write_profile(ProfileSource::Registration {
            principal: &credential.principal,
            names,
        })
        .await?;

        tracing::info!(uid = %credential.principal.uid, "Registered new account");
        Ok(credential)
    }

    /// Sign in with email and password, refreshing only `lastLogin`.
    pub async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential> {
        let credential = self
            .identity
            .authenticate(email, password)
            .await
            .map_err(AuthError::Authentication)?;

        self.record_login(&credential.principal.uid).await?;

        tracing::info!(uid = %credential.principal.uid, "Signed in with password");
        Ok(credential)
    }

    /// Sign in through a third-party provider and write the full profile.
    ///
    /// First and last name are split out of the provider's display name.
    pub async fn sign_in_with_federated_provider(
        &self,
        kind: ProviderKind,
    ) -> Result<UserCredential> {
        let credential = self
            .identity
            .authenticate_interactive(kind)
            .await
            .map_err(AuthError::Authentication)?;

        self.write_profile(ProfileSource::Federated(&credential.principal))
            .await?;

        tracing::info!(
            uid = %credential.principal.uid,
            provider = %kind,
            "Signed in with federated provider"
        );
        Ok(credential)
    }

    /// End the session. Never touches the profile store.
    pub async fn sign_out(&self, credential: &UserCredential) -> Result<()> {
        self.identity
            .end_session(credential)
            .await
            .map_err(AuthError::SignOut)?;

        tracing::info!(uid = %credential.principal.uid, "Signed out");
        Ok(())
    }

    // ─── Profile Writes ──────────────────────────────────────────

    /// Create-or-merge the full profile shape derived from `source`.
    ///
    /// Safe to call again if an earlier write failed after authentication.
    pub async fn write_profile(&self, source: ProfileSource<'_>) -> Result<ProfileRecord> {
        let record = ProfileRecord::derive(source, &self.now());
        self.apply(&record.id, ProfileWrite::Full(record.clone()))
            .await?;
        Ok(record)
    }

    /// Merge `lastLogin = now` into the profile for `uid`.
    pub async fn record_login(&self, uid: &str) -> Result<()> {
        self.apply(uid, ProfileWrite::LastLogin(self.now())).await
    }

    async fn apply(&self, uid: &str, write: ProfileWrite) -> Result<()> {
        tracing::debug!(uid, fields = ?write.field_paths(), "Merging profile fields");
        let fields = write.into_document();

        self.store
            .upsert(&self.collection, uid, &fields)
            .await
            .map_err(|e| {
                tracing::error!(uid, error = %e, "Profile write failed");
                AuthError::StoreWrite(e)
            })
    }

    // ─── Profile Reads ───────────────────────────────────────────

    /// Get the stored profile for a principal.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<ProfileRecord>> {
        let Some(doc) = self
            .store
            .get(&self.collection, uid)
            .await
            .map_err(AuthError::StoreRead)?
        else {
            return Ok(None);
        };

        serde_json::from_value(serde_json::Value::Object(doc))
            .map(Some)
            .map_err(|e| AuthError::StoreRead(StoreError::Decode(e.to_string())))
    }
}
