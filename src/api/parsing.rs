use serde_json::Value;

use crate::core::models::{PrAction, PullRequestEvent};

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// Builds the event from a webhook payload.
///
/// Returns `None` when the payload has no `pull_request` object. Missing text
/// fields become empty strings; a missing or blank `diff_url` becomes `None`.
pub fn parse_pull_request_event(payload: &Value) -> Option<PullRequestEvent> {
    let pr = payload.get("pull_request").filter(|pr| pr.is_object())?;
    let text = |path: &[&str]| v_str(pr, path).unwrap_or_default().to_string();

    Some(PullRequestEvent {
        action: PrAction::parse(v_str(payload, &["action"]).unwrap_or_default()),
        title: text(&["title"]),
        url: text(&["html_url"]),
        base_branch: text(&["base", "ref"]),
        head_branch: text(&["head", "ref"]),
        diff_location: v_str(pr, &["diff_url"])
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(ToString::to_string),
    })
}

pub fn get_header_value<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
