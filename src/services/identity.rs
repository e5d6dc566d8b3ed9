// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider seam.

use crate::error::ProviderError;
use crate::models::{ProviderKind, UserCredential};
use async_trait::async_trait;

/// External identity provider that verifies credentials and issues sessions.
///
/// Errors are provider-defined and are passed through to callers unchanged.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new email/password principal and sign it in.
    async fn create_principal(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError>;

    /// Sign in an existing email/password principal.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<UserCredential, ProviderError>;

    /// Run an interactive sign-in with a third-party provider.
    async fn authenticate_interactive(
        &self,
        kind: ProviderKind,
    ) -> Result<UserCredential, ProviderError>;

    /// Set the principal's display name, returning the updated session.
    async fn update_display_name(
        &self,
        credential: &UserCredential,
        display_name: &str,
    ) -> Result<UserCredential, ProviderError>;

    /// End the given session.
    async fn end_session(&self, credential: &UserCredential) -> Result<(), ProviderError>;
}

/// Token obtained from a third-party provider's OAuth flow.
#[derive(Clone)]
pub enum IdpCredential {
    /// OIDC ID token (Google)
    IdToken(String),
    /// OAuth access token (Facebook)
    AccessToken(String),
}

/// Performs the interactive leg of a federated sign-in (popup, redirect,
/// device flow) and hands back the provider's token.
#[async_trait]
pub trait FederatedCredentialSource: Send + Sync {
    /// Return [`ProviderError::PopupClosed`] if the user abandons the flow.
    async fn credential_for(&self, kind: ProviderKind) -> Result<IdpCredential, ProviderError>;
}
