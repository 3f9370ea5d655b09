//! Domain services for the field dispatch backend.
//!
//! Services contain business logic that operates on domain models.

pub mod command_queue;
pub mod identity;

pub use command_queue::{CommandQueueService, QueueError};
pub use identity::{ApiKeyRecord, IdentityDirectory, InMemoryIdentityDirectory};
