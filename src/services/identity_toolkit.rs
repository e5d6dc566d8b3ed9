// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Identity Toolkit REST client.
//!
//! Handles:
//! - Email/password registration and sign-in
//! - Display name updates
//! - Federated sign-in from a provider token (`accounts:signInWithIdp`)

use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{Principal, Provenance, ProviderKind, UserCredential};
use crate::services::identity::{FederatedCredentialSource, IdentityProvider, IdpCredential};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity Toolkit API client.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    request_uri: String,
    federated: Option<Arc<dyn FederatedCredentialSource>>,
}

impl IdentityToolkitClient {
    /// Create a client for the project's web API key.
    ///
    /// Requests go to the Auth emulator when `auth_emulator_host` is set.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed building HTTP client: {e}")))?;

        let base_url = match &config.auth_emulator_host {
            Some(host) => format!("http://{}/identitytoolkit.googleapis.com/v1", host),
            None => IDENTITY_TOOLKIT_URL.to_string(),
        };

        Ok(Self {
            http,
            base_url,
            api_key: config.firebase_api_key.clone(),
            request_uri: config.idp_request_uri.clone(),
            federated: None,
        })
    }

    /// Override the API base URL (e.g. `http://127.0.0.1:9099/v1`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attach the source of third-party tokens for federated sign-in.
    pub fn with_federated_source(mut self, source: Arc<dyn FederatedCredentialSource>) -> Self {
        self.federated = Some(source);
        self
    }

    /// POST a JSON body to `accounts:{method}`.
    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/accounts:{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);

            tracing::debug!(status = status.as_u16(), message = %message, "Identity Toolkit error");
            return Err(ProviderError::from_error_message(status.as_u16(), &message));
        }

        response.json().await.map_err(|e| ProviderError::Other {
            status: status.as_u16(),
            message: format!("JSON parse error: {}", e),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn create_principal(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response: AccountResponse = self.post("signUp", &body).await?;
        response.into_session(Provenance::Password)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response: AccountResponse = self.post("signInWithPassword", &body).await?;
        response.into_session(Provenance::Password)
    }

    async fn authenticate_interactive(
        &self,
        kind: ProviderKind,
    ) -> Result<UserCredential, ProviderError> {
        let source = self
            .federated
            .as_ref()
            .ok_or(ProviderError::FederatedUnavailable(kind))?;

        let post_body = match source.credential_for(kind).await? {
            IdpCredential::IdToken(token) => format!(
                "id_token={}&providerId={}",
                urlencoding::encode(&token),
                kind.provider_id()
            ),
            IdpCredential::AccessToken(token) => format!(
                "access_token={}&providerId={}",
                urlencoding::encode(&token),
                kind.provider_id()
            ),
        };

        let body = serde_json::json!({
            "postBody": post_body,
            "requestUri": self.request_uri,
            "returnSecureToken": true,
            "returnIdpCredential": true,
        });

        let response: AccountResponse = self.post("signInWithIdp", &body).await?;
        response.into_session(Provenance::Federated(kind))
    }

    async fn update_display_name(
        &self,
        credential: &UserCredential,
        display_name: &str,
    ) -> Result<UserCredential, ProviderError> {
        let body = serde_json::json!({
            "idToken": credential.id_token,
            "displayName": display_name,
            "returnSecureToken": true,
        });

        let response: AccountResponse = self.post("update", &body).await?;

        let mut updated = credential.clone();
        updated.principal.display_name =
            non_empty(response.display_name).or_else(|| non_empty(Some(display_name.to_string())));
        if let Some(photo_url) = non_empty(response.photo_url) {
            updated.principal.photo_url = Some(photo_url);
        }
        // A refreshed token is only returned when the update rotates it.
        if !response.id_token.is_empty() {
            updated.id_token = response.id_token;
            updated.refresh_token = response.refresh_token.or(updated.refresh_token);
        }
        Ok(updated)
    }

    async fn end_session(&self, credential: &UserCredential) -> Result<(), ProviderError> {
        // ID tokens are bearer tokens; there is no client-side revoke call.
        tracing::debug!(uid = %credential.principal.uid, "Identity Toolkit session ended");
        Ok(())
    }
}

/// Account payload shared by the `signUp`, `signInWithPassword`, `update`
/// and `signInWithIdp` responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    #[serde(default)]
    local_id: String,
    #[serde(default)]
    id_token: String,
    refresh_token: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    /// Only present on `signInWithIdp`
    full_name: Option<String>,
    photo_url: Option<String>,
    /// `signInWithIdp` sets this instead of signing in when the email is
    /// already registered with another provider.
    #[serde(default)]
    need_confirmation: bool,
    /// `signInWithIdp` can report failures with HTTP 200 and this field.
    error_message: Option<String>,
}

impl AccountResponse {
    /// Convert a sign-in response into a session, rejecting responses that
    /// did not actually sign anyone in.
    fn into_session(self, provenance: Provenance) -> Result<UserCredential, ProviderError> {
        if let Some(message) = non_empty(self.error_message.clone()) {
            tracing::debug!(message = %message, "Identity Toolkit sign-in rejected");
            return Err(ProviderError::from_error_message(200, &message));
        }
        if self.need_confirmation {
            tracing::debug!(provenance = ?provenance, "Identity Toolkit requires account linking");
            return Err(ProviderError::AccountExistsWithDifferentCredential);
        }
        if self.id_token.is_empty() || self.local_id.is_empty() {
            return Err(ProviderError::Other {
                status: 200,
                message: "sign-in response is missing idToken or localId".to_string(),
            });
        }
        Ok(self.into_credential(provenance))
    }

    fn into_credential(self, provenance: Provenance) -> UserCredential {
        let display_name = non_empty(self.display_name).or_else(|| non_empty(self.full_name));

        UserCredential {
            principal: Principal {
                uid: self.local_id,
                display_name,
                email: non_empty(self.email),
                photo_url: non_empty(self.photo_url),
                provenance,
            },
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

/// Identity Toolkit reports absent profile fields as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
