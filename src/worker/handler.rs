use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::pipeline::Pipeline;
use crate::core::models::NotificationJob;

/// Creates the queue between the webhook endpoint and the dispatcher.
#[must_use]
pub fn job_queue(
    capacity: usize,
) -> (mpsc::Sender<NotificationJob>, mpsc::Receiver<NotificationJob>) {
    mpsc::channel(capacity)
}

/// Consumes jobs until the queue closes, running each in its own task.
///
/// Jobs may interleave; steps within one job never do. In-flight jobs are
/// awaited before returning.
pub async fn run_dispatcher(mut jobs: mpsc::Receiver<NotificationJob>, pipeline: Arc<Pipeline>) {
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            maybe_job = jobs.recv() => {
                let Some(job) = maybe_job else { break };
                let pipeline = Arc::clone(&pipeline);
                tasks.spawn(async move { pipeline.process(job).await });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    error!("Notification task panicked or was cancelled: {}", e);
                }
            }
        }
    }

    info!(in_flight = tasks.len(), "Job queue closed, draining notification tasks");
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("Notification task panicked or was cancelled: {}", e);
        }
    }
}
