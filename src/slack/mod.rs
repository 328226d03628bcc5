//! All Slack-specific functionality

pub mod client;
pub mod format;
pub mod publisher;

// Re-export main types for convenience
pub use client::SlackClient;
pub use format::format_notification;
pub use publisher::{
    ChatBackend, ChatPublisher, ChatSession, ConnectionState, PublishRequest, PublisherHandle,
    ResolvedChannel, publish_queue,
};
