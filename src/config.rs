//! Application configuration loaded from environment variables.

use crate::db::collections;
use std::env;

/// Configuration for the identity provider and profile store, loaded once
/// at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase web API key (identifies the project to Identity Toolkit)
    pub firebase_api_key: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Collection holding profile documents
    pub profile_collection: String,
    /// Auth emulator `host:port`, if running against the emulator
    pub auth_emulator_host: Option<String>,
    /// `requestUri` sent with federated sign-in
    pub idp_request_uri: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            firebase_api_key: "test_api_key".to_string(),
            gcp_project_id: "test-project".to_string(),
            profile_collection: collections::USERS.to_string(),
            auth_emulator_host: None,
            idp_request_uri: "http://localhost".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            profile_collection: env::var("PROFILE_COLLECTION")
                .unwrap_or_else(|_| collections::USERS.to_string()),
            auth_emulator_host: env::var("FIREBASE_AUTH_EMULATOR_HOST")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            idp_request_uri: env::var("IDP_REQUEST_URI")
                .unwrap_or_else(|_| "http://localhost".to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
