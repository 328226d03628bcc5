//! Notification text for pull request events.
//!
//! The output is Slack mrkdwn: single asterisks render as bold.

use crate::core::models::PullRequestEvent;

/// Build the chat message announcing a pull request and its summary.
///
/// The function is pure: the same event and summary always produce the
/// same text.
///
/// # Arguments
///
/// * `event` - The pull request the notification is about
/// * `summary` - Summary text, or a fallback message when none is available
///
/// # Examples
///
/// ```
/// use pr_relay::core::models::{PrAction, PullRequestEvent};
/// use pr_relay::slack::format::format_notification;
///
/// let event = PullRequestEvent {
///     action: PrAction::Opened,
///     title: "Add cache".to_string(),
///     url: "https://github.com/acme/app/pull/7".to_string(),
///     base_branch: "main".to_string(),
///     head_branch: "feature/cache".to_string(),
///     diff_location: None,
/// };
/// let message = format_notification(&event, "Adds an LRU cache.");
/// assert!(message.starts_with("*Pull Request*: Add cache\n"));
/// ```
#[must_use]
pub fn format_notification(event: &PullRequestEvent, summary: &str) -> String {
    format!(
        "*Pull Request*: {}\n\
         *Link*: {}\n\
         *Branches*: {} <- {}\n\n\
         *Summary of Changes*:\n{}",
        event.title, event.url, event.base_branch, event.head_branch, summary
    )
}
