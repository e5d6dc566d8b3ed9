// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile record model and the rules for deriving it from a sign-in.

use crate::db::Document;
use crate::models::ProfileSource;
use serde::{Deserialize, Serialize};

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile document stored in the `users` collection, keyed by principal ID.
///
/// Missing fields decode to their defaults, since a document may have been
/// created by a bare `lastLogin` merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileRecord {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// When the profile was (last) fully written (ISO 8601)
    #[serde(rename = "signUpDate")]
    pub sign_up_date: String,
    /// Most recent successful sign-in (ISO 8601)
    #[serde(rename = "lastLogin")]
    pub last_login: String,
}

impl ProfileRecord {
    /// Derive the full profile shape for a sign-in at `now`.
    ///
    /// `signUpDate` and `lastLogin` are both set to `now`.
    pub fn derive(source: ProfileSource<'_>, now: &str) -> Self {
        let principal = source.principal();

        let (first_name, last_name) = match source {
            ProfileSource::Registration { names, .. } => {
                (names.first_name.clone(), names.last_name.clone())
            }
            ProfileSource::Federated(principal) => {
                split_display_name(principal.display_name.as_deref())
            }
        };

        let display_name = match principal.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} {}", first_name, last_name).trim().to_string(),
        };

        Self {
            id: principal.uid.clone(),
            display_name,
            email: principal.email.clone(),
            photo_url: principal.photo_url.clone(),
            first_name,
            last_name,
            sign_up_date: now.to_string(),
            last_login: now.to_string(),
        }
    }
}

/// Split a display name into first and last name.
///
/// The first whitespace-separated token is the first name; the remaining
/// tokens joined by single spaces are the last name.
pub fn split_display_name(display_name: Option<&str>) -> (String, String) {
    let mut tokens = display_name.unwrap_or_default().split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// A merge write against a profile document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileWrite {
    /// Every profile field, including `signUpDate`.
    Full(ProfileRecord),
    /// Only `lastLogin`.
    LastLogin(String),
}

impl ProfileWrite {
    /// Field paths this write replaces; all other stored fields are kept.
    pub fn field_paths(&self) -> Vec<&'static str> {
        match self {
            ProfileWrite::Full(_) => vec![
                "id",
                "displayName",
                "email",
                "photoURL",
                "firstName",
                "lastName",
                "signUpDate",
                "lastLogin",
            ],
            ProfileWrite::LastLogin(_) => vec!["lastLogin"],
        }
    }

    /// Convert to the field map sent to the store.
    pub fn into_document(self) -> Document {
        match self {
            ProfileWrite::Full(record) => {
                let mut doc = Document::new();
                doc.insert("id".into(), record.id.into());
                doc.insert("displayName".into(), record.display_name.into());
                doc.insert("email".into(), record.email.into());
                doc.insert("photoURL".into(), record.photo_url.into());
                doc.insert("firstName".into(), record.first_name.into());
                doc.insert("lastName".into(), record.last_name.into());
                doc.insert("signUpDate".into(), record.sign_up_date.into());
                doc.insert("lastLogin".into(), record.last_login.into());
                doc
            }
            ProfileWrite::LastLogin(at) => {
                let mut doc = Document::new();
                doc.insert("lastLogin".into(), at.into());
                doc
            }
        }
    }
}
