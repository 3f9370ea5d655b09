//! Command queue service.
//!
//! The single authority over command lifecycle legality and over what a
//! controller is allowed to see. Nothing else writes `status`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::clock::Clock;
use shared::pagination::{Page, PageRequest};
use shared::validation::{validate_action, validate_parameter};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Command, CommandStatus};
use crate::services::identity::IdentityDirectory;
use crate::store::{CommandFilter, CommandPatch, CommandStore, NewCommand, StoreError, UpdateOutcome};

/// Errors surfaced by queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Command not found: {0}")]
    CommandNotFound(Uuid),

    #[error("Controller not found: {0}")]
    ControllerNotFound(Uuid),

    #[error("Invalid transition for command {id}: {current} -> {requested}")]
    InvalidTransition {
        id: Uuid,
        current: CommandStatus,
        requested: CommandStatus,
    },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage error: {0}")]
    Store(String),
}

impl QueueError {
    /// Both missing commands and missing controllers are "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CommandNotFound(_) | Self::ControllerNotFound(_))
    }
}

impl From<StoreError> for QueueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(msg) => QueueError::ConstraintViolation(msg),
            StoreError::Unavailable(msg) => QueueError::Store(msg),
        }
    }
}

/// Lifecycle operations over the command store.
#[derive(Clone)]
pub struct CommandQueueService {
    store: Arc<dyn CommandStore>,
    directory: Arc<dyn IdentityDirectory>,
    clock: Arc<dyn Clock>,
}

impl CommandQueueService {
    pub fn new(
        store: Arc<dyn CommandStore>,
        directory: Arc<dyn IdentityDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Enqueue a pending command for a controller.
    ///
    /// Nothing is persisted when the controller does not exist.
    pub async fn enqueue(
        &self,
        controller_id: Uuid,
        action: &str,
        parameter: &str,
    ) -> Result<Command, QueueError> {
        validate_action(action).map_err(|e| QueueError::ConstraintViolation(e.to_string()))?;
        validate_parameter(parameter)
            .map_err(|e| QueueError::ConstraintViolation(e.to_string()))?;

        if !self.directory.controller_exists(controller_id).await? {
            tracing::debug!(controller_id = %controller_id, "Enqueue rejected: unknown controller");
            return Err(QueueError::ControllerNotFound(controller_id));
        }

        let command = self
            .store
            .insert(NewCommand::new(controller_id, action, parameter))
            .await?;

        tracing::info!(
            command_id = %command.id,
            controller_id = %controller_id,
            action = %command.action,
            "Command enqueued"
        );

        Ok(command)
    }

    /// Fetch a command by id.
    pub async fn get(&self, id: Uuid) -> Result<Command, QueueError> {
        self.store
            .get(id)
            .await?
            .ok_or(QueueError::CommandNotFound(id))
    }

    /// Unfiltered administrative listing; `total` counts every stored command.
    pub async fn list_all(&self, page: PageRequest) -> Result<Page<Command>, QueueError> {
        Ok(self.store.list(CommandFilter::all(), page).await?)
    }

    /// The polling view: pending commands owned by `controller_id` only.
    ///
    /// `total` counts this controller's pending commands, independent of the
    /// page window.
    pub async fn list_pending_for_controller(
        &self,
        controller_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Command>, QueueError> {
        let result = self
            .store
            .list(CommandFilter::pending_for(controller_id), page)
            .await?;

        tracing::debug!(
            controller_id = %controller_id,
            returned = result.len(),
            pending = result.total,
            "Pending commands polled"
        );

        Ok(result)
    }

    /// Move a pending command to a terminal status.
    ///
    /// Strict: acknowledging a command that is already terminal fails with
    /// `InvalidTransition` and leaves the first outcome untouched.
    pub async fn acknowledge(
        &self,
        id: Uuid,
        new_status: CommandStatus,
        executed_at: Option<DateTime<Utc>>,
    ) -> Result<Command, QueueError> {
        // Only pending commands move, so the store precondition is Pending.
        if !CommandStatus::Pending.can_transition_to(new_status) {
            let current = self.get(id).await?;
            tracing::warn!(
                command_id = %id,
                current = %current.status,
                requested = %new_status,
                "Rejected transition back to pending"
            );
            return Err(QueueError::InvalidTransition {
                id,
                current: current.status,
                requested: new_status,
            });
        }

        let executed_at = executed_at.unwrap_or_else(|| self.clock.now());
        let patch = CommandPatch::transition_from_pending(new_status, executed_at);

        match self.store.update(id, patch).await? {
            UpdateOutcome::Updated(command) => {
                tracing::info!(
                    command_id = %id,
                    controller_id = %command.controller_id,
                    status = %command.status,
                    "Command acknowledged"
                );
                Ok(command)
            }
            UpdateOutcome::NotFound => Err(QueueError::CommandNotFound(id)),
            UpdateOutcome::PreconditionFailed(current) => {
                tracing::warn!(
                    command_id = %id,
                    current = %current.status,
                    requested = %new_status,
                    "Rejected acknowledgment of terminal command"
                );
                Err(QueueError::InvalidTransition {
                    id,
                    current: current.status,
                    requested: new_status,
                })
            }
        }
    }

    /// Administrative hard delete. Not a lifecycle transition.
    pub async fn remove(&self, id: Uuid) -> Result<(), QueueError> {
        if !self.store.delete(id).await? {
            return Err(QueueError::CommandNotFound(id));
        }
        tracing::info!(command_id = %id, "Command removed");
        Ok(())
    }

    /// Number of pending commands across all controllers.
    pub async fn pending_backlog(&self) -> Result<u64, QueueError> {
        let filter = CommandFilter {
            controller_id: None,
            status: Some(CommandStatus::Pending),
        };
        let page = self.store.list(filter, PageRequest::new(0, 1, 1)).await?;
        Ok(page.total)
    }

    /// Readiness of the backing store.
    pub async fn ping(&self) -> Result<(), QueueError> {
        Ok(self.store.ping().await?)
    }
}
