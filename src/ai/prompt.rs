use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};

pub const SYSTEM_PROMPT: &str = "You are an experienced code review assistant.";

/// Diffs longer than this are cut before being sent, keeping the prompt inside
/// the model context window.
pub const MAX_DIFF_CHARS: usize = 48_000;

const TRUNCATION_MARKER: &str = "\n... [diff truncated]";

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Cuts the diff to `MAX_DIFF_CHARS` characters on a char boundary.
#[must_use]
pub fn truncate_diff(diff: &str) -> String {
    if diff.chars().count() <= MAX_DIFF_CHARS {
        return diff.to_string();
    }
    let mut cut: String = diff.chars().take(MAX_DIFF_CHARS).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[must_use]
pub fn build_user_prompt(diff: &str) -> String {
    format!(
        "You are a code review assistant. \
         Analyze the following diff and produce a summary of the changes made:\n\n\
         {}\n\n\
         Please list the main changes and their impact.",
        truncate_diff(diff)
    )
}

#[must_use]
pub fn build_prompt(diff: &str) -> Vec<ChatCompletionMessage> {
    vec![
        ChatCompletionMessage {
            role: MessageRole::system,
            content: Content::Text(SYSTEM_PROMPT.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
        ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(build_user_prompt(diff)),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
    ]
}
