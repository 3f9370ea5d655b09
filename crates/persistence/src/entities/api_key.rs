//! API key entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::services::ApiKeyRecord;
use sqlx::FromRow;

/// Database row mapping for the api_keys table.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKeyEntity {
    pub id: i64,
    pub key_hash: String,
    pub key_prefix: String,
    pub name: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ApiKeyEntity> for ApiKeyRecord {
    fn from(entity: ApiKeyEntity) -> Self {
        Self {
            id: entity.id,
            key_prefix: entity.key_prefix,
            is_active: entity.is_active,
            is_admin: entity.is_admin,
            expires_at: entity.expires_at,
        }
    }
}
