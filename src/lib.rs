//! pr-relay - posts AI-summarized GitHub pull request notifications to Slack.
//!
//! The service runs three long-lived tasks in one process:
//! 1. An HTTP server that accepts GitHub webhooks and queues qualifying pull request events
//! 2. A dispatcher that runs the fetch, summarize, format and publish pipeline per event
//! 3. A chat event loop that owns the Slack session and serializes message delivery
//!
//! # Architecture
//!
//! The system uses:
//! - axum for the webhook endpoint
//! - reqwest for GitHub diff retrieval and `OpenAI` chat completions
//! - slack-morphism for Slack API interactions
//! - Tokio mpsc queues between the tasks
//!
//! # Example
//!
//! ```no_run
//! use pr_relay::core::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Set up structured logging
//!     pr_relay::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     pr_relay::server::run(config).await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod github;
pub mod server;
pub mod slack;
pub mod worker;

pub use errors::{RelayError, SummaryError};

/// Configure structured JSON logging.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls keep the first subscriber.
///
/// # Example
///
/// ```
/// pr_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
