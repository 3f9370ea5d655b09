//! Command store contract.
//!
//! The store is the system of record for commands. It knows nothing about
//! the lifecycle beyond enforcing record-level constraints; transition
//! legality belongs to [`crate::services::CommandQueueService`].

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::pagination::{Page, PageRequest};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Command, CommandStatus};

pub use memory::InMemoryCommandStore;

/// Storage-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness, referential, length or check constraint rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The backing storage could not be reached or failed transiently.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A command to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommand {
    pub controller_id: Uuid,
    pub action: String,
    pub parameter: String,
    /// Creation time; the store stamps it from its clock when absent.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewCommand {
    pub fn new(controller_id: Uuid, action: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            controller_id,
            action: action.into(),
            parameter: parameter.into(),
            created_at: None,
        }
    }
}

/// Field-level update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPatch {
    pub status: Option<CommandStatus>,
    pub executed_at: Option<DateTime<Utc>>,
    /// Precondition checked atomically with the write.
    pub only_if_status: Option<CommandStatus>,
}

impl CommandPatch {
    /// Patch that moves a pending command to `status`, stamping `executed_at`.
    pub fn transition_from_pending(status: CommandStatus, executed_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            executed_at: Some(executed_at),
            only_if_status: Some(CommandStatus::Pending),
        }
    }

    /// Applies the supplied fields to `command`.
    pub fn apply_to(&self, command: &mut Command) {
        if let Some(status) = self.status {
            command.status = status;
        }
        if let Some(executed_at) = self.executed_at {
            command.executed_at = Some(executed_at);
        }
    }
}

/// Result of a (possibly conditional) update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The patch was applied; carries the stored record.
    Updated(Command),
    /// No command has the given id.
    NotFound,
    /// `only_if_status` did not match; carries the unchanged record.
    PreconditionFailed(Command),
}

/// Listing predicate, pushed down into the store query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandFilter {
    pub controller_id: Option<Uuid>,
    pub status: Option<CommandStatus>,
}

impl CommandFilter {
    /// Matches every command.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches pending commands owned by one controller.
    pub fn pending_for(controller_id: Uuid) -> Self {
        Self {
            controller_id: Some(controller_id),
            status: Some(CommandStatus::Pending),
        }
    }

    pub fn matches(&self, command: &Command) -> bool {
        self.controller_id
            .map_or(true, |id| command.controller_id == id)
            && self.status.map_or(true, |status| command.status == status)
    }
}

/// Durable keyed storage for commands.
///
/// Every operation is atomic with respect to a single record. Listings are
/// returned in insertion order.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Persists a new pending command, assigning `id` and `created_at`.
    async fn insert(&self, command: NewCommand) -> Result<Command, StoreError>;

    /// Point lookup by id.
    async fn get(&self, id: Uuid) -> Result<Option<Command>, StoreError>;

    /// Applies `patch` to the command, honouring its precondition atomically.
    async fn update(&self, id: Uuid, patch: CommandPatch) -> Result<UpdateOutcome, StoreError>;

    /// Hard delete. Returns `false` when the id does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Filtered, paged listing; `total` counts every match of `filter`.
    async fn list(&self, filter: CommandFilter, page: PageRequest)
        -> Result<Page<Command>, StoreError>;

    /// Checks that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
