//! Inbound webhook endpoint and request processing

pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;

// Re-export the main handler for convenience
pub use handler::{WebhookState, handle_webhook, router};
