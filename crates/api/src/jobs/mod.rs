//! Background job scheduler and job implementations.

mod pending_backlog;
mod pool_metrics;
mod scheduler;

pub use pending_backlog::PendingBacklogJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
