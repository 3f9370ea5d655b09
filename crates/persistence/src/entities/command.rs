//! Command entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Command, CommandStatus};
use domain::store::StoreError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the commands table.
#[derive(Debug, Clone, FromRow)]
pub struct CommandEntity {
    pub id: Uuid,
    pub seq: i64,
    pub controller_id: Uuid,
    pub action: String,
    pub parameter: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl CommandEntity {
    /// Converts the row into the domain model.
    pub fn into_domain(self) -> Result<Command, StoreError> {
        let status: CommandStatus = self.status.parse().map_err(|e: String| {
            StoreError::ConstraintViolation(format!("command {}: {}", self.id, e))
        })?;

        Ok(Command {
            id: self.id,
            controller_id: self.controller_id,
            action: self.action,
            parameter: self.parameter,
            status,
            created_at: self.created_at,
            executed_at: self.executed_at,
        })
    }
}
