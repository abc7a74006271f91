use thiserror::Error;

/// Reasons a URL could not be turned into a [`Reference`](super::Reference).
///
/// Every variant except `EmptyPath` carries the offending input so the caller
/// can show what was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    #[error("url path should not be empty")]
    EmptyPath,

    #[error("url host should be a valid GitHub, GitLab, or Bitbucket host; received: {0}")]
    UnsupportedHost(String),

    #[error("url path should contain <user>/<repo>, received: {0}")]
    MissingRepository(String),

    #[error("raw url path should contain <owner>/<repo>/<branch>/<path/to/file>, received: {0}")]
    MalformedRawPath(String),

    #[error("url path should contain {layout}, received: {path}")]
    MalformedPath { layout: &'static str, path: String },

    #[error("url path should contain {expected}, received: {path}")]
    UnknownPathKeyword { expected: &'static str, path: String },

    #[error("url path should contain path to directory or file, received: {0}")]
    IncompletePath(String),
}
