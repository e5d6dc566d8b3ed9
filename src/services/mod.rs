// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - identity provider adapters and profile reconciliation.

pub mod identity;
pub mod identity_toolkit;
pub mod reconciler;

pub use identity::{FederatedCredentialSource, IdentityProvider, IdpCredential};
pub use identity_toolkit::IdentityToolkitClient;
pub use reconciler::Reconciler;
