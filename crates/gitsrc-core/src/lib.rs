//! gitsrc Core Library
//!
//! Resolves GitHub, GitLab and Bitbucket URLs into structured references,
//! classifies repository access, and fetches referenced resources to disk.

pub mod access;
pub mod config;
pub mod context;
pub mod extract;
pub mod fs;
pub mod git;
pub mod reference;

/// Re-exports of commonly used types
pub mod prelude {
    // Reference parsing
    pub use crate::reference::{Host, ParseError, Reference, parse};

    // Access classification
    pub use crate::access::{AccessClassifier, AuthError, HttpRequest, Transport, TransportError};

    // Fetching
    pub use crate::git::{CloneError, GitFetcher, ProcessError, ProcessRunner};

    // Extraction
    pub use crate::extract::{ExtractError, ResourceExtractor, download_to_destination};

    // Configuration
    pub use crate::config::FetchConfig;
    pub use crate::context::FetchContext;
}
