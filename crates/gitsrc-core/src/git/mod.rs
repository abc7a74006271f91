//! Git operations for fetching referenced repositories.
//!
//! This module provides:
//! - An allow-listed process runner (only `git` may be executed)
//! - Clone URL construction with provider-specific credentials
//! - Classification of clone failures by whether a token was used

mod fetcher;
mod runner;

pub use fetcher::{CloneAuth, CloneError, GitFetcher};
pub use runner::{ProcessError, ProcessRunner, SupportedCommand, SystemRunner};
