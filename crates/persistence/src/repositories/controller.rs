//! Controller lookups.
//!
//! Controllers are registered elsewhere; this repository only reads them.

use sqlx::PgPool;
use uuid::Uuid;

/// Read-only repository over the controllers table.
#[derive(Debug, Clone)]
pub struct ControllerRepository {
    pool: PgPool,
}

impl ControllerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether a controller with this id exists.
    pub async fn exists(&self, controller_id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM controllers WHERE id = $1)
            "#,
        )
        .bind(controller_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
