// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity-provider side of a sign-in: who authenticated, and how.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Third-party provider used for federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ProviderKind {
    Google,
    Facebook,
}

impl ProviderKind {
    /// Provider ID as understood by the identity provider.
    pub fn provider_id(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google.com",
            ProviderKind::Facebook => "facebook.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_id())
    }
}

/// Which sign-in path produced a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Password,
    Federated(ProviderKind),
}

/// Authenticated identity returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Provider-assigned unique ID (also the profile document ID)
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub provenance: Provenance,
}

/// Session handle for a signed-in principal.
///
/// Passed explicitly to operations that act on the current session instead
/// of living in process-wide state.
#[derive(Clone)]
pub struct UserCredential {
    pub principal: Principal,
    /// Provider-issued ID token (bearer)
    pub id_token: String,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("principal", &self.principal)
            .field("id_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Name fields supplied by the caller at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFields {
    pub first_name: String,
    pub last_name: String,
}

impl NameFields {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `"<first> <last>"` with surrounding whitespace trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// What a full profile write is derived from.
///
/// Each sign-in path carries only the fields it can actually supply.
#[derive(Debug, Clone, Copy)]
pub enum ProfileSource<'a> {
    /// Direct registration: names come from the caller.
    Registration {
        principal: &'a Principal,
        names: &'a NameFields,
    },
    /// Federated sign-in: names are split out of the display name.
    Federated(&'a Principal),
}

impl<'a> ProfileSource<'a> {
    pub fn principal(&self) -> &'a Principal {
        match self {
            ProfileSource::Registration { principal, .. } => principal,
            ProfileSource::Federated(principal) => principal,
        }
    }
}
