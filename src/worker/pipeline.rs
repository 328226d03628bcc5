use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};

use crate::ai::summarizer::{Summarize, SummaryOutcome};
use crate::core::models::{NotificationJob, PullRequestEvent};
use crate::errors::RelayError;
use crate::github::DiffSource;
use crate::slack::format::format_notification;
use crate::slack::publisher::ChatPublisher;

/// Fetch, summarize, format and publish, strictly in that order.
pub struct Pipeline {
    diff_source: Arc<dyn DiffSource>,
    summarizer: Arc<dyn Summarize>,
    publisher: Arc<dyn ChatPublisher>,
    channel_id: String,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        diff_source: Arc<dyn DiffSource>,
        summarizer: Arc<dyn Summarize>,
        publisher: Arc<dyn ChatPublisher>,
        channel_id: String,
    ) -> Self {
        Self {
            diff_source,
            summarizer,
            publisher,
            channel_id,
        }
    }

    /// Produces the summary for an event, degrading to a fallback outcome
    /// instead of failing.
    pub async fn summarize_event(&self, event: &PullRequestEvent) -> SummaryOutcome {
        let Some(location) = event.diff_location.as_deref() else {
            info!("Pull request has no diff_url, skipping diff fetch");
            return SummaryOutcome::MissingDiffLocation;
        };

        let diff = self.diff_source.fetch(location).await;
        self.summarizer.summarize(&diff).await
    }

    /// Runs one job to completion.
    ///
    /// # Errors
    ///
    /// Returns the delivery error; every earlier step degrades instead.
    pub async fn run(&self, job: &NotificationJob) -> Result<(), RelayError> {
        let summary = self.summarize_event(&job.event).await;
        let message = format_notification(&job.event, summary.as_message());
        self.publisher.publish(&self.channel_id, &message).await
    }

    /// Runs a job inside its own span and logs the outcome.
    pub async fn process(&self, job: NotificationJob) {
        let span = info_span!(
            "notification",
            correlation_id = %job.correlation_id,
            action = %job.event.action,
            pr_url = %job.event.url,
        );

        async {
            info!("Processing pull request notification");
            match self.run(&job).await {
                Ok(()) => info!("Pull request notification sent"),
                Err(e) => error!("Pull request notification not sent: {}", e),
            }
        }
        .instrument(span)
        .await;
    }
}
