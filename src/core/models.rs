use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pull request lifecycle action as reported in the webhook `action` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrAction {
    Opened,
    Edited,
    Synchronize,
    Reopened,
    Other(String),
}

impl PrAction {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "opened" => Self::Opened,
            "edited" => Self::Edited,
            "synchronize" => Self::Synchronize,
            "reopened" => Self::Reopened,
            other => Self::Other(other.to_string()),
        }
    }

    /// Only these actions produce a chat notification.
    #[must_use]
    pub fn triggers_notification(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for PrAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => f.write_str("opened"),
            Self::Edited => f.write_str("edited"),
            Self::Synchronize => f.write_str("synchronize"),
            Self::Reopened => f.write_str("reopened"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    pub action: PrAction,
    pub title: String,
    pub url: String,
    pub base_branch: String,
    pub head_branch: String,
    pub diff_location: Option<String>,
}

/// Unit of work handed from the webhook endpoint to the pipeline worker.
#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub correlation_id: Uuid,
    pub event: PullRequestEvent,
}

impl NotificationJob {
    #[must_use]
    pub fn new(event: PullRequestEvent) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            event,
        }
    }
}
