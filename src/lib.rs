// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Profile-Sync: keep user profile documents in step with sign-in.
//!
//! This crate wraps an identity provider (email/password and federated
//! sign-in) and writes a per-user profile record to a document store after
//! every successful registration or sign-in.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;

pub use error::{AuthError, ProviderError, StoreError};
pub use models::{NameFields, Principal, ProfileRecord, ProviderKind, UserCredential};
pub use services::Reconciler;
