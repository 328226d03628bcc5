//! Background notification processing

pub mod handler;
pub mod pipeline;

// Re-export the main entry points for convenience
pub use handler::{job_queue, run_dispatcher};
pub use pipeline::Pipeline;
