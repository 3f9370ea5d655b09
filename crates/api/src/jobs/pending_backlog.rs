//! Background job publishing the pending command backlog.

use domain::services::CommandQueueService;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_pending_backlog;

/// Periodically sets the `dispatch_commands_pending` gauge.
///
/// A growing backlog means controllers have stopped polling or
/// acknowledging.
pub struct PendingBacklogJob {
    queue: CommandQueueService,
}

impl PendingBacklogJob {
    pub fn new(queue: CommandQueueService) -> Self {
        Self { queue }
    }
}

#[async_trait::async_trait]
impl Job for PendingBacklogJob {
    fn name(&self) -> &'static str {
        "pending_backlog"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(30)
    }

    async fn execute(&self) -> Result<(), String> {
        let pending = self
            .queue
            .pending_backlog()
            .await
            .map_err(|e| e.to_string())?;

        tracing::debug!(pending, "Pending backlog sampled");
        record_pending_backlog(pending);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::InMemoryIdentityDirectory;
    use domain::store::InMemoryCommandStore;
    use shared::clock::SystemClock;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pending_backlog_job_executes() {
        let directory = Arc::new(InMemoryIdentityDirectory::new());
        let controller = directory.add_controller();
        let queue = CommandQueueService::new(
            Arc::new(InMemoryCommandStore::default()),
            directory,
            Arc::new(SystemClock),
        );
        queue.enqueue(controller, "abrir_valvula", "1").await.unwrap();

        let job = PendingBacklogJob::new(queue);
        assert_eq!(job.name(), "pending_backlog");
        assert_eq!(job.frequency().duration().as_secs(), 30);
        assert!(job.execute().await.is_ok());
    }
}
