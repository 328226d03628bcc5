#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pr_relay::ai::summarizer::{Summarize, SummaryOutcome};
use pr_relay::core::config::AppConfig;
use pr_relay::core::models::{PrAction, PullRequestEvent};
use pr_relay::errors::RelayError;
use pr_relay::github::DiffSource;
use pr_relay::slack::ChatPublisher;
use serde_json::{Value, json};

pub fn config_with(overrides: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = [
        ("GITHUB_TOKEN", "ghp_test"),
        ("OPENAI_API_KEY", "sk-test"),
        ("SLACK_BOT_TOKEN", "xoxb-test"),
        ("SLACK_CHANNEL_ID", "C0123456789"),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert((*k).to_string(), (*v).to_string());
    }
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config should be valid")
}

pub fn sample_event() -> PullRequestEvent {
    PullRequestEvent {
        action: PrAction::Opened,
        title: "Add request timeouts".to_string(),
        url: "https://github.com/acme/relay/pull/42".to_string(),
        base_branch: "main".to_string(),
        head_branch: "feature/timeouts".to_string(),
        diff_location: Some("https://github.com/acme/relay/pull/42.diff".to_string()),
    }
}

pub fn pr_payload(action: &str) -> Value {
    json!({
        "action": action,
        "number": 42,
        "pull_request": {
            "title": "Add request timeouts",
            "html_url": "https://github.com/acme/relay/pull/42",
            "diff_url": "https://github.com/acme/relay/pull/42.diff",
            "base": { "ref": "main" },
            "head": { "ref": "feature/timeouts" }
        }
    })
}

/// Diff source returning a fixed text and recording requested locations.
#[derive(Default)]
pub struct FakeDiffSource {
    pub diff: String,
    pub calls: Mutex<Vec<String>>,
}

impl FakeDiffSource {
    pub fn returning(diff: &str) -> Arc<Self> {
        Arc::new(Self {
            diff: diff.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiffSource for FakeDiffSource {
    async fn fetch(&self, location: &str) -> String {
        self.calls.lock().unwrap().push(location.to_string());
        self.diff.clone()
    }
}

/// Summarizer returning a fixed summary for non-empty diffs.
pub struct FakeSummarizer {
    pub summary: String,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    pub fn returning(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            summary: summary.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarize for FakeSummarizer {
    async fn summarize(&self, diff: &str) -> SummaryOutcome {
        self.calls.lock().unwrap().push(diff.to_string());
        if diff.trim().is_empty() {
            SummaryOutcome::NoContent
        } else {
            SummaryOutcome::Summary(self.summary.clone())
        }
    }
}

/// Publisher recording `(channel_id, message)` pairs.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPublisher for RecordingPublisher {
    async fn publish(&self, channel_id: &str, message: &str) -> Result<(), RelayError> {
        self.published
            .lock()
            .unwrap()
            .push((channel_id.to_string(), message.to_string()));
        if self.fail {
            Err(RelayError::ChannelNotFound(channel_id.to_string()))
        } else {
            Ok(())
        }
    }
}
