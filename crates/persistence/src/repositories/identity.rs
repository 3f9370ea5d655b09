//! PostgreSQL identity directory.

use async_trait::async_trait;
use domain::services::{ApiKeyRecord, IdentityDirectory};
use domain::store::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use super::{map_sqlx_error, ApiKeyRepository, ControllerRepository};
use crate::metrics::QueryTimer;

/// Identity directory reading the controllers and api_keys tables.
#[derive(Debug, Clone)]
pub struct PgIdentityDirectory {
    controllers: ControllerRepository,
    api_keys: ApiKeyRepository,
}

impl PgIdentityDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            controllers: ControllerRepository::new(pool.clone()),
            api_keys: ApiKeyRepository::new(pool),
        }
    }
}

#[async_trait]
impl IdentityDirectory for PgIdentityDirectory {
    async fn controller_exists(&self, controller_id: Uuid) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("controllers_exists");
        let result = self.controllers.exists(controller_id).await;
        timer.record();
        result.map_err(map_sqlx_error)
    }

    async fn find_api_key(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>, StoreError> {
        let timer = QueryTimer::new("api_keys_find_by_hash");
        let result = self.api_keys.find_by_key_hash(key_hash).await;
        timer.record();
        Ok(result.map_err(map_sqlx_error)?.map(ApiKeyRecord::from))
    }

    async fn record_key_use(&self, key_id: i64) -> Result<(), StoreError> {
        self.api_keys
            .update_last_used(key_id)
            .await
            .map_err(map_sqlx_error)
    }
}
