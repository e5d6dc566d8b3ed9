// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for sign-in and profile reconciliation.

use crate::models::ProviderKind;

/// Failure reported by the identity provider.
///
/// These are surfaced to callers unmodified, wrapped in the [`AuthError`]
/// variant for the operation that produced them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Email address already in use")]
    EmailExists,

    #[error("Password is too weak: {0}")]
    WeakPassword(String),

    #[error("Malformed email address")]
    InvalidEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account has been disabled")]
    UserDisabled,

    #[error("Sign-in method is not enabled for this project")]
    OperationNotAllowed,

    #[error("Too many attempts, try again later")]
    TooManyAttempts,

    #[error("Interactive sign-in was cancelled")]
    PopupClosed,

    /// The federated email already belongs to an account that signs in
    /// another way; the provider wants the user to confirm linking.
    #[error("An account already exists with a different sign-in method")]
    AccountExistsWithDifferentCredential,

    #[error("Federated credential is already linked to another account")]
    CredentialAlreadyInUse,

    #[error("No federated credential source configured for {0}")]
    FederatedUnavailable(ProviderKind),

    #[error("Identity provider network error: {0}")]
    Network(String),

    #[error("Identity provider error (HTTP {status}): {message}")]
    Other { status: u16, message: String },
}

impl ProviderError {
    /// Map an Identity Toolkit error message (e.g. `EMAIL_EXISTS` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`).
    pub fn from_error_message(status: u16, message: &str) -> Self {
        let (code, detail) = match message.split_once(':') {
            Some((code, detail)) => (code.trim(), detail.trim()),
            None => (message.trim(), ""),
        };

        match code {
            "EMAIL_EXISTS" => ProviderError::EmailExists,
            "WEAK_PASSWORD" => ProviderError::WeakPassword(detail.to_string()),
            "INVALID_EMAIL" | "MISSING_EMAIL" => ProviderError::InvalidEmail,
            "EMAIL_NOT_FOUND"
            | "INVALID_PASSWORD"
            | "MISSING_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_IDP_RESPONSE" => ProviderError::InvalidCredentials,
            "USER_DISABLED" => ProviderError::UserDisabled,
            "OPERATION_NOT_ALLOWED" => ProviderError::OperationNotAllowed,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => ProviderError::TooManyAttempts,
            "NEED_CONFIRMATION" => ProviderError::AccountExistsWithDifferentCredential,
            "FEDERATED_USER_ID_ALREADY_LINKED" => ProviderError::CredentialAlreadyInUse,
            _ => ProviderError::Other {
                status,
                message: message.to_string(),
            },
        }
    }
}

/// Document store failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Database not connected (offline mode)")]
    Offline,

    #[error("Database error: {0}")]
    Backend(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),
}

/// Error returned by [`Reconciler`](crate::services::Reconciler) operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected principal creation, or the display-name update
    /// that follows it.
    #[error("Registration rejected: {0}")]
    Registration(#[source] ProviderError),

    /// Credential mismatch or an aborted interactive flow.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] ProviderError),

    #[error("Sign out failed: {0}")]
    SignOut(#[source] ProviderError),

    /// The principal is authenticated but its profile write did not land.
    #[error("Profile write failed: {0}")]
    StoreWrite(#[source] StoreError),

    #[error("Profile read failed: {0}")]
    StoreRead(#[source] StoreError),
}

impl AuthError {
    /// The underlying provider error, if the provider step failed.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            AuthError::Registration(e) | AuthError::Authentication(e) | AuthError::SignOut(e) => {
                Some(e)
            }
            AuthError::StoreWrite(_) | AuthError::StoreRead(_) => None,
        }
    }

    /// True when authentication succeeded and only the profile write failed.
    ///
    /// The write can be retried on its own with
    /// [`Reconciler::write_profile`](crate::services::Reconciler::write_profile)
    /// or [`Reconciler::record_login`](crate::services::Reconciler::record_login).
    pub fn is_profile_write_failure(&self) -> bool {
        matches!(self, AuthError::StoreWrite(_))
    }
}

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, AuthError>;
