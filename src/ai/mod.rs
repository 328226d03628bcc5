//! All AI/LLM functionality

pub mod client;
pub mod prompt;
pub mod summarizer;

// Re-export main types for convenience
pub use client::LlmClient;
pub use prompt::estimate_tokens;
pub use summarizer::{DiffSummarizer, Summarize, SummaryOutcome};
