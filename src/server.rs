//! Process wiring: chat event loop, job dispatcher and HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::ai::{DiffSummarizer, LlmClient};
use crate::api::{WebhookState, router};
use crate::core::config::AppConfig;
use crate::errors::RelayError;
use crate::github::GithubDiffFetcher;
use crate::slack::{ChatSession, SlackClient, publish_queue};
use crate::worker::{Pipeline, job_queue, run_dispatcher};

const JOB_QUEUE_CAPACITY: usize = 256;
const PUBLISH_QUEUE_CAPACITY: usize = 64;

/// Runs the relay until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Fails if the chat session cannot be established, the listen port cannot be
/// bound, or the HTTP server stops with an error.
pub async fn run(config: AppConfig) -> Result<(), RelayError> {
    let mut session = ChatSession::new(SlackClient::new(config.slack_bot_token.clone())?);
    session.connect().await?;

    let (publisher, publish_requests) = publish_queue(PUBLISH_QUEUE_CAPACITY, config.publish_timeout);
    let chat_loop = tokio::spawn(session.run(publish_requests));

    let pipeline = Arc::new(Pipeline::new(
        Arc::new(GithubDiffFetcher::new(&config)?),
        Arc::new(DiffSummarizer::new(LlmClient::new(&config)?)),
        Arc::new(publisher),
        config.slack_channel_id.clone(),
    ));

    let (jobs, job_receiver) = job_queue(JOB_QUEUE_CAPACITY);
    let dispatcher = tokio::spawn(run_dispatcher(job_receiver, pipeline));

    if config.signature_verification_enabled() {
        info!("Webhook signature verification enabled");
    }
    let app = router(WebhookState::new(jobs, &config.github_webhook_secret));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::ServerError(format!("failed to bind {addr}: {e}")))?;
    info!("Webhook server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::ServerError(e.to_string()));

    // The router owned the last job sender; the dispatcher drains and drops
    // the last publisher handle, which ends the chat loop.
    if let Err(e) = dispatcher.await {
        error!("Job dispatcher stopped abnormally: {}", e);
    }
    if let Err(e) = chat_loop.await {
        error!("Chat event loop stopped abnormally: {}", e);
    }

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
