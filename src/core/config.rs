use std::env;
use std::time::Duration;

use crate::errors::RelayError;

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const DEFAULT_DIFF_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, read once at startup and passed to every component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: String,
    pub github_webhook_secret: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub openai_api_base: String,
    pub slack_bot_token: String,
    pub slack_channel_id: String,
    pub port: u16,
    pub diff_timeout: Duration,
    pub openai_timeout: Duration,
    pub publish_timeout: Duration,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `RelayError::ConfigError` naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::ConfigError` naming the first missing or invalid variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| RelayError::ConfigError(format!("{key} is not set")))
        };
        let seconds = |key: &str, default: u64| -> Result<Duration, RelayError> {
            match optional(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| RelayError::ConfigError(format!("{key}: {e}"))),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let port = match optional("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| RelayError::ConfigError(format!("PORT: {e}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            github_token: required("GITHUB_TOKEN")?,
            github_webhook_secret: optional("GITHUB_WEBHOOK_SECRET").unwrap_or_default(),
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_org_id: optional("OPENAI_ORG_ID"),
            openai_model: optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_api_base: optional("OPENAI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_channel_id: required("SLACK_CHANNEL_ID")?,
            port,
            diff_timeout: seconds("DIFF_TIMEOUT_SECS", DEFAULT_DIFF_TIMEOUT_SECS)?,
            openai_timeout: seconds("OPENAI_TIMEOUT_SECS", DEFAULT_OPENAI_TIMEOUT_SECS)?,
            publish_timeout: seconds("PUBLISH_TIMEOUT_SECS", DEFAULT_PUBLISH_TIMEOUT_SECS)?,
        })
    }

    #[must_use]
    pub fn signature_verification_enabled(&self) -> bool {
        !self.github_webhook_secret.is_empty()
    }
}
