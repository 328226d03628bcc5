//! GitHub-facing functionality

pub mod diff;

pub use diff::{DiffSource, GithubDiffFetcher};
