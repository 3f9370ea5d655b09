//! Identity directory contract.
//!
//! Controllers and API keys are owned by other parts of the platform. The
//! dispatch service only needs to know whether a controller exists and
//! which principal an API key belongs to.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::crypto::{extract_key_prefix, sha256_hex};
use uuid::Uuid;

use crate::store::StoreError;

/// An API key as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    pub id: i64,
    pub key_prefix: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    /// Returns `true` if the key is active and not expired at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at >= at,
            None => true,
        }
    }
}

/// Resolves controller references and API keys.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Whether a controller with this id is registered.
    async fn controller_exists(&self, controller_id: Uuid) -> Result<bool, StoreError>;

    /// Looks up an API key by the SHA-256 hex digest of the raw key.
    async fn find_api_key(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>, StoreError>;

    /// Records that a key was just used. Best effort.
    async fn record_key_use(&self, key_id: i64) -> Result<(), StoreError>;
}

/// Identity directory held in memory, for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryIdentityDirectory {
    controllers: RwLock<HashSet<Uuid>>,
    api_keys: RwLock<HashMap<String, ApiKeyRecord>>,
}

impl InMemoryIdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller id.
    pub fn register_controller(&self, controller_id: Uuid) {
        self.controllers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(controller_id);
    }

    /// Registers a new random controller and returns its id.
    pub fn add_controller(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.register_controller(id);
        id
    }

    /// Registers a raw API key (stored hashed) and returns its record id.
    pub fn register_api_key(&self, raw_key: &str, is_admin: bool) -> i64 {
        let mut keys = self.api_keys.write().unwrap_or_else(|e| e.into_inner());
        let id = keys.len() as i64 + 1;
        keys.insert(
            sha256_hex(raw_key),
            ApiKeyRecord {
                id,
                key_prefix: extract_key_prefix(raw_key).unwrap_or_default().to_string(),
                is_active: true,
                is_admin,
                expires_at: None,
            },
        );
        id
    }

    /// Marks a previously registered key inactive.
    pub fn deactivate_api_key(&self, raw_key: &str) {
        let mut keys = self.api_keys.write().unwrap_or_else(|e| e.into_inner());
        if let Some(record) = keys.get_mut(&sha256_hex(raw_key)) {
            record.is_active = false;
        }
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn controller_exists(&self, controller_id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .controllers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&controller_id))
    }

    async fn find_api_key(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>, StoreError> {
        Ok(self
            .api_keys
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key_hash)
            .cloned())
    }

    async fn record_key_use(&self, _key_id: i64) -> Result<(), StoreError> {
        Ok(())
    }
}
