//! In-memory command store.
//!
//! Used by tests and for running the API without PostgreSQL. Enforces the
//! same record constraints the `commands` table does, except referential
//! integrity to controllers (the queue service checks that beforehand).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use shared::clock::{Clock, SystemClock};
use shared::pagination::{Page, PageRequest};
use shared::validation::MAX_COMMAND_FIELD_LENGTH;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CommandFilter, CommandPatch, CommandStore, NewCommand, StoreError, UpdateOutcome};
use crate::models::{Command, CommandStatus};

#[derive(Debug, Default)]
struct Rows {
    next_seq: u64,
    /// Insertion sequence -> command.
    by_seq: BTreeMap<u64, Command>,
    /// Command id -> insertion sequence.
    seq_by_id: HashMap<Uuid, u64>,
}

/// Command store backed by process memory.
#[derive(Debug)]
pub struct InMemoryCommandStore {
    rows: RwLock<Rows>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCommandStore {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: RwLock::new(Rows::default()),
            clock,
        }
    }

    /// Number of stored commands.
    pub async fn len(&self) -> usize {
        self.rows.read().await.by_seq.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCommandStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

fn check_field(name: &str, value: &str) -> Result<(), StoreError> {
    if value.chars().count() > MAX_COMMAND_FIELD_LENGTH {
        return Err(StoreError::ConstraintViolation(format!(
            "{} exceeds {} characters",
            name, MAX_COMMAND_FIELD_LENGTH
        )));
    }
    Ok(())
}

#[async_trait]
impl CommandStore for InMemoryCommandStore {
    async fn insert(&self, command: NewCommand) -> Result<Command, StoreError> {
        check_field("action", &command.action)?;
        check_field("parameter", &command.parameter)?;

        let record = Command {
            id: Uuid::new_v4(),
            controller_id: command.controller_id,
            action: command.action,
            parameter: command.parameter,
            status: CommandStatus::Pending,
            created_at: command.created_at.unwrap_or_else(|| self.clock.now()),
            executed_at: None,
        };

        let mut rows = self.rows.write().await;
        if rows.seq_by_id.contains_key(&record.id) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate command id {}",
                record.id
            )));
        }
        let seq = rows.next_seq;
        rows.next_seq += 1;
        rows.seq_by_id.insert(record.id, seq);
        rows.by_seq.insert(seq, record.clone());

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Command>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .seq_by_id
            .get(&id)
            .and_then(|seq| rows.by_seq.get(seq))
            .cloned())
    }

    async fn update(&self, id: Uuid, patch: CommandPatch) -> Result<UpdateOutcome, StoreError> {
        // Check-and-set happens under one write guard.
        let mut rows = self.rows.write().await;
        let Some(seq) = rows.seq_by_id.get(&id).copied() else {
            return Ok(UpdateOutcome::NotFound);
        };
        let Some(current) = rows.by_seq.get_mut(&seq) else {
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(expected) = patch.only_if_status {
            if current.status != expected {
                return Ok(UpdateOutcome::PreconditionFailed(current.clone()));
            }
        }

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        if let Some(violation) = updated.invariant_violation() {
            return Err(StoreError::ConstraintViolation(violation));
        }

        *current = updated.clone();
        Ok(UpdateOutcome::Updated(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.seq_by_id.remove(&id) {
            Some(seq) => {
                rows.by_seq.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(
        &self,
        filter: CommandFilter,
        page: PageRequest,
    ) -> Result<Page<Command>, StoreError> {
        let rows = self.rows.read().await;
        let matching = rows.by_seq.values().filter(|c| filter.matches(c));

        let total = matching.clone().count() as u64;
        let items = matching
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
