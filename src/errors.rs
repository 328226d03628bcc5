use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to parse webhook payload: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to access OpenAI API: {0}")]
    OpenAIError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Chat channel not found or inaccessible: {0}")]
    ChannelNotFound(String),

    #[error("Chat connection is not ready (state: {0})")]
    NotReady(String),

    #[error("Work queue is closed: {0}")]
    QueueClosed(String),

    #[error("Timed out after {0}s: {1}")]
    Timeout(u64, String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<SlackClientError> for RelayError {
    fn from(error: SlackClientError) -> Self {
        RelayError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::HttpError(error.to_string())
    }
}

/// Why a summarization request produced no summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("OpenAI request failed: {0}")]
    Http(String),

    #[error("OpenAI returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OpenAI response was malformed: {0}")]
    MalformedResponse(String),

    #[error("OpenAI request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SummaryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SummaryError::Timeout
        } else {
            SummaryError::Http(error.to_string())
        }
    }
}
