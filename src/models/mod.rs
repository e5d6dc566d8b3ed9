// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod principal;
pub mod profile;

pub use principal::{
    NameFields, Principal, ProfileSource, Provenance, ProviderKind, UserCredential,
};
pub use profile::{split_display_name, ProfileRecord, ProfileWrite};
