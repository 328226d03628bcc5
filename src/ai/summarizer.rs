use async_trait::async_trait;
use tracing::{error, info};

use super::client::LlmClient;
use super::prompt::build_prompt;
use crate::errors::SummaryError;

pub const NO_CONTENT_MESSAGE: &str = "There is no content to analyze or the diff is empty.";
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to summarize the changes with the AI service.";
pub const MISSING_DIFF_LOCATION_MESSAGE: &str = "Pull request has no 'diff_url'.";

/// Result of summarizing one pull request.
#[derive(Debug)]
pub enum SummaryOutcome {
    Summary(String),
    NoContent,
    MissingDiffLocation,
    Failed(SummaryError),
}

impl SummaryOutcome {
    /// Text placed under the summary header of the notification.
    #[must_use]
    pub fn as_message(&self) -> &str {
        match self {
            Self::Summary(text) => text,
            Self::NoContent => NO_CONTENT_MESSAGE,
            Self::MissingDiffLocation => MISSING_DIFF_LOCATION_MESSAGE,
            Self::Failed(_) => SUMMARY_FAILED_MESSAGE,
        }
    }
}

#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, diff: &str) -> SummaryOutcome;
}

pub struct DiffSummarizer {
    llm: LlmClient,
}

impl DiffSummarizer {
    #[must_use]
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Summarize for DiffSummarizer {
    async fn summarize(&self, diff: &str) -> SummaryOutcome {
        if diff.trim().is_empty() {
            info!("Diff is empty, skipping summarization");
            return SummaryOutcome::NoContent;
        }

        match self.llm.complete(&build_prompt(diff)).await {
            Ok(summary) => SummaryOutcome::Summary(summary),
            Err(e) => {
                error!("Failed to call OpenAI: {}", e);
                SummaryOutcome::Failed(e)
            }
        }
    }
}
