//! Pull request diff retrieval
//!
//! Fetch failures never escalate: callers receive an empty diff, which the
//! summarizer treats as "nothing to analyze".

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use tracing::{debug, error, warn};
use url::Url;

use crate::core::config::AppConfig;
use crate::errors::RelayError;

pub const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const CLIENT_USER_AGENT: &str = "pr-relay";

/// Source of raw unified diffs.
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Returns the diff text, or an empty string when it could not be fetched.
    async fn fetch(&self, location: &str) -> String;
}

pub struct GithubDiffFetcher {
    http: Client,
    token: String,
}

impl GithubDiffFetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, RelayError> {
        let http = Client::builder().timeout(config.diff_timeout).build()?;
        Ok(Self {
            http,
            token: config.github_token.clone(),
        })
    }

    /// Performs the request and reports every failure explicitly.
    ///
    /// # Errors
    ///
    /// Returns an error for unusable locations, transport failures and any
    /// status other than 200.
    pub async fn try_fetch(&self, location: &str) -> Result<String, RelayError> {
        let url = Url::parse(location)
            .map_err(|e| RelayError::ParseError(format!("invalid diff location {location}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayError::ParseError(format!(
                "unsupported diff location scheme: {}",
                url.scheme()
            )));
        }

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, DIFF_MEDIA_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RelayError::HttpError(format!(
                "diff request returned status {}",
                status.as_u16()
            )));
        }

        let text = response.text().await?;
        debug!(diff_bytes = text.len(), "received PR diff");
        Ok(text)
    }
}

#[async_trait]
impl DiffSource for GithubDiffFetcher {
    async fn fetch(&self, location: &str) -> String {
        match self.try_fetch(location).await {
            Ok(text) => text,
            Err(RelayError::HttpError(msg)) => {
                warn!(location, "Could not fetch diff: {}", msg);
                String::new()
            }
            Err(e) => {
                error!(location, "Could not fetch diff: {}", e);
                String::new()
            }
        }
    }
}
