// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use profile_sync::db::{FirestoreDb, MemoryStore, ProfileStore};
use profile_sync::error::ProviderError;
use profile_sync::models::{Principal, Provenance, ProviderKind, UserCredential};
use profile_sync::services::IdentityProvider;
use profile_sync::time_utils::{format_utc_iso8601, Clock};
use profile_sync::Reconciler;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Time `secs` seconds after the fixed test epoch (2024-01-15T10:00:00Z).
#[allow(dead_code)]
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap() + Duration::seconds(secs)
}

/// ISO string for [`at`].
#[allow(dead_code)]
pub fn iso(secs: i64) -> String {
    format_utc_iso8601(at(secs))
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

struct Account {
    uid: String,
    password: String,
    display_name: Option<String>,
}

/// In-memory identity provider with Identity Toolkit-like error behavior.
#[derive(Default)]
pub struct FakeIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    federated: Mutex<HashMap<ProviderKind, Principal>>,
    next_uid: AtomicUsize,
    fail_display_name_update: AtomicBool,
    ended_sessions: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The principal returned by the next interactive sign-in with `kind`.
    pub fn set_federated(&self, kind: ProviderKind, principal: Principal) {
        self.federated.lock().unwrap().insert(kind, principal);
    }

    pub fn fail_display_name_update(&self) {
        self.fail_display_name_update.store(true, Ordering::SeqCst);
    }

    pub fn ended_sessions(&self) -> Vec<String> {
        self.ended_sessions.lock().unwrap().clone()
    }

    fn credential(&self, uid: &str, email: &str, display_name: Option<String>) -> UserCredential {
        UserCredential {
            principal: Principal {
                uid: uid.to_string(),
                display_name,
                email: Some(email.to_string()),
                photo_url: None,
                provenance: Provenance::Password,
            },
            id_token: format!("id-token-{uid}"),
            refresh_token: Some(format!("refresh-token-{uid}")),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_principal(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError> {
        if !email.contains('@') {
            return Err(ProviderError::InvalidEmail);
        }
        if password.len() < 6 {
            return Err(ProviderError::WeakPassword(
                "Password should be at least 6 characters".to_string(),
            ));
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(ProviderError::EmailExists);
        }

        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst) + 1);
        accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
                display_name: None,
            },
        );

        Ok(self.credential(&uid, email, None))
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => {
                Ok(self.credential(&account.uid, email, account.display_name.clone()))
            }
            _ => Err(ProviderError::InvalidCredentials),
        }
    }

    async fn authenticate_interactive(
        &self,
        kind: ProviderKind,
    ) -> Result<UserCredential, ProviderError> {
        let principal = self
            .federated
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .ok_or(ProviderError::PopupClosed)?;

        Ok(UserCredential {
            id_token: format!("id-token-{}", principal.uid),
            refresh_token: None,
            principal,
        })
    }

    async fn update_display_name(
        &self,
        credential: &UserCredential,
        display_name: &str,
    ) -> Result<UserCredential, ProviderError> {
        if self.fail_display_name_update.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("connection reset".to_string()));
        }

        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| a.uid == credential.principal.uid)
            .ok_or(ProviderError::InvalidCredentials)?;
        account.display_name = Some(display_name.to_string()).filter(|n| !n.is_empty());

        let mut updated = credential.clone();
        updated.principal.display_name = account.display_name.clone();
        Ok(updated)
    }

    async fn end_session(&self, credential: &UserCredential) -> Result<(), ProviderError> {
        self.ended_sessions
            .lock()
            .unwrap()
            .push(credential.principal.uid.clone());
        Ok(())
    }
}

/// Federated principal as a provider would return it.
#[allow(dead_code)]
pub fn federated_principal(
    uid: &str,
    display_name: Option<&str>,
    kind: ProviderKind,
) -> Principal {
    Principal {
        uid: uid.to_string(),
        display_name: display_name.map(str::to_string),
        email: Some(format!("{uid}@example.com")),
        photo_url: Some(format!("https://example.com/{uid}.png")),
        provenance: Provenance::Federated(kind),
    }
}

/// Reconciler wired to in-memory collaborators.
#[allow(dead_code)]
pub struct Harness {
    pub reconciler: Reconciler,
    pub identity: Arc<FakeIdentityProvider>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    let identity = Arc::new(FakeIdentityProvider::new());
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(at(0)));

    let reconciler = Reconciler::new(identity.clone(), store.clone()).with_clock(clock.clone());

    Harness {
        reconciler,
        identity,
        store,
        clock,
    }
}

/// Reconciler whose store is the offline Firestore mock.
#[allow(dead_code)]
pub fn harness_with_offline_store() -> (Reconciler, Arc<FakeIdentityProvider>) {
    let identity = Arc::new(FakeIdentityProvider::new());
    let store: Arc<dyn ProfileStore> = Arc::new(FirestoreDb::new_mock());
    let reconciler = Reconciler::new(identity.clone(), store)
        .with_clock(Arc::new(ManualClock::new(at(0))));
    (reconciler, identity)
}
