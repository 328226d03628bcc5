mod common;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use pr_relay::api::signature::{SIGNATURE_HEADER, compute_signature};
use pr_relay::api::{WebhookState, handle_webhook};
use pr_relay::core::models::{NotificationJob, PrAction};
use pr_relay::worker::{Pipeline, job_queue};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn post(state: &WebhookState, headers: HeaderMap, body: &[u8]) -> Response {
    handle_webhook(State(state.clone()), headers, Bytes::copy_from_slice(body)).await
}

fn state(secret: &str) -> (WebhookState, mpsc::Receiver<NotificationJob>) {
    let (jobs, receiver) = job_queue(8);
    (WebhookState::new(jobs, secret), receiver)
}

#[tokio::test]
async fn test_payload_without_pull_request_is_acknowledged_and_ignored() {
    let (state, mut jobs) = state("");
    let body = json!({ "zen": "Keep it logically awesome.", "hook_id": 1 }).to_string();

    let response = post(&state, HeaderMap::new(), body.as_bytes()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    assert!(matches!(jobs.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_non_triggering_actions_are_acknowledged_and_ignored() {
    let (state, mut jobs) = state("");

    for action in ["closed", "labeled", "assigned", "review_requested"] {
        let body = common::pr_payload(action).to_string();
        let response = post(&state, HeaderMap::new(), body.as_bytes()).await;

        assert_eq!(response.status(), StatusCode::OK, "action {action}");
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    assert!(matches!(jobs.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_triggering_actions_enqueue_one_job_each() {
    let (state, mut jobs) = state("");

    for action in ["opened", "edited", "synchronize", "reopened"] {
        let body = common::pr_payload(action).to_string();
        let response = post(&state, HeaderMap::new(), body.as_bytes()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let job = jobs.try_recv().expect("job should be queued");
        assert_eq!(job.event.action, PrAction::parse(action));
        assert_eq!(job.event.title, "Add request timeouts");
        assert_eq!(job.event.url, "https://github.com/acme/relay/pull/42");
        assert_eq!(job.event.base_branch, "main");
        assert_eq!(job.event.head_branch, "feature/timeouts");
        assert_eq!(
            job.event.diff_location.as_deref(),
            Some("https://github.com/acme/relay/pull/42.diff")
        );
    }

    assert!(matches!(jobs.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_missing_diff_url_still_enqueues() {
    let (state, mut jobs) = state("");
    let mut payload = common::pr_payload("opened");
    payload["pull_request"]
        .as_object_mut()
        .expect("pull_request object")
        .remove("diff_url");

    let response = post(&state, HeaderMap::new(), payload.to_string().as_bytes()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let job = jobs.try_recv().expect("job should be queued");
    assert_eq!(job.event.diff_location, None);
}

#[tokio::test]
async fn test_unparseable_body_is_rejected() {
    let (state, mut jobs) = state("");

    let response = post(&state, HeaderMap::new(), b"{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await.get("error").is_some());
    assert!(matches!(jobs.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_full_queue_still_acknowledges() {
    let (jobs, _receiver) = job_queue(1);
    let state = WebhookState::new(jobs, "");
    let body = common::pr_payload("opened").to_string();

    let first = post(&state, HeaderMap::new(), body.as_bytes()).await;
    let second = post(&state, HeaderMap::new(), body.as_bytes()).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signature_required_when_secret_configured() {
    let (state, mut jobs) = state("topsecret");
    let body = common::pr_payload("opened").to_string();

    let unsigned = post(&state, HeaderMap::new(), body.as_bytes()).await;
    assert_eq!(unsigned.status(), StatusCode::UNAUTHORIZED);

    let mut bad = HeaderMap::new();
    bad.insert(
        SIGNATURE_HEADER,
        HeaderValue::from_str(&compute_signature(body.as_bytes(), "wrong")).unwrap(),
    );
    let forged = post(&state, bad, body.as_bytes()).await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    assert!(matches!(jobs.try_recv(), Err(TryRecvError::Empty)));

    let mut good = HeaderMap::new();
    good.insert(
        SIGNATURE_HEADER,
        HeaderValue::from_str(&compute_signature(body.as_bytes(), "topsecret")).unwrap(),
    );
    let signed = post(&state, good, body.as_bytes()).await;
    assert_eq!(signed.status(), StatusCode::OK);
    assert!(jobs.try_recv().is_ok());
}

#[tokio::test]
async fn test_opened_event_end_to_end() {
    let (state, mut jobs) = state("");
    let diff_source = common::FakeDiffSource::returning("diff --git a/x b/x\n+changed\n");
    let summarizer = common::FakeSummarizer::returning("X changed.");
    let publisher = Arc::new(common::RecordingPublisher::default());
    let pipeline = Pipeline::new(
        diff_source.clone(),
        summarizer.clone(),
        publisher.clone(),
        "C0123456789".to_string(),
    );

    let body = common::pr_payload("opened").to_string();
    let response = post(&state, HeaderMap::new(), body.as_bytes()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let job = jobs.try_recv().expect("job should be queued");
    pipeline.process(job).await;

    assert_eq!(
        diff_source.calls(),
        vec!["https://github.com/acme/relay/pull/42.diff".to_string()]
    );
    let published = publisher.published();
    assert_eq!(published.len(), 1);
    let (channel_id, message) = &published[0];
    assert_eq!(channel_id, "C0123456789");

    let order: Vec<usize> = [
        "Add request timeouts",
        "https://github.com/acme/relay/pull/42",
        "main",
        "feature/timeouts",
        "X changed.",
    ]
    .iter()
    .map(|needle| message.find(needle).expect("field present"))
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}
