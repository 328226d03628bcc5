//! Webhook endpoint - validates, filters and enqueues pull request events.
//!
//! This module handles:
//! - Optional GitHub signature verification
//! - Payload parsing and pull request filtering
//! - Handing qualifying events to the worker queue without waiting on them

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::post;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use super::{helpers, parsing, signature};
use crate::core::models::NotificationJob;

pub const WEBHOOK_PATH: &str = "/webhook";

/// Shared state of the webhook endpoint.
#[derive(Clone)]
pub struct WebhookState {
    jobs: mpsc::Sender<NotificationJob>,
    webhook_secret: Arc<str>,
}

impl WebhookState {
    /// An empty `webhook_secret` disables signature verification.
    #[must_use]
    pub fn new(jobs: mpsc::Sender<NotificationJob>, webhook_secret: &str) -> Self {
        Self {
            jobs,
            webhook_secret: Arc::from(webhook_secret),
        }
    }
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_webhook))
        .with_state(state)
}

/// Handler for `POST /webhook`.
///
/// Answers `200 {"status": "ok"}` for every well-formed JSON body, whether
/// or not a notification was scheduled.
#[tracing::instrument(level = "info", skip_all)]
pub async fn handle_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.webhook_secret.is_empty()
        && let Err(response) = verify_signature(&body, &headers, &state.webhook_secret)
    {
        return response;
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse webhook payload: {}", e);
            return helpers::err_response(StatusCode::BAD_REQUEST, "invalid JSON");
        }
    };

    let Some(event) = parsing::parse_pull_request_event(&payload) else {
        debug!("Ignoring payload without pull_request");
        return helpers::ok_status();
    };

    if !event.action.triggers_notification() {
        info!(action = %event.action, "Ignoring pull request action");
        return helpers::ok_status();
    }

    let job = NotificationJob::new(event);
    info!(
        correlation_id = %job.correlation_id,
        action = %job.event.action,
        pr_url = %job.event.url,
        "Queueing pull request notification"
    );

    match state.jobs.try_send(job) {
        Ok(()) => {}
        Err(TrySendError::Full(job)) => {
            error!(correlation_id = %job.correlation_id, "Job queue full, dropping notification");
        }
        Err(TrySendError::Closed(job)) => {
            error!(correlation_id = %job.correlation_id, "Job queue closed, dropping notification");
        }
    }

    helpers::ok_status()
}

fn verify_signature(body: &[u8], headers: &HeaderMap, secret: &str) -> Result<(), Response> {
    let Some(sig) = parsing::get_header_value(headers, signature::SIGNATURE_HEADER) else {
        error!("Missing {} header", signature::SIGNATURE_HEADER);
        return Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Missing X-Hub-Signature-256 header",
        ));
    };

    if !signature::verify_github_signature(body, sig, secret) {
        return Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Invalid webhook signature",
        ));
    }

    Ok(())
}
