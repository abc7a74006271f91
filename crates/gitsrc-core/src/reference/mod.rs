//! Source-control URL references.
//!
//! This module turns a provider URL into a [`Reference`]:
//! - GitHub (`github.com`) and its raw-content host (`raw.githubusercontent.com`)
//! - GitLab (`gitlab.com`)
//! - Bitbucket (`bitbucket.org`)
//!
//! Parsing is pure: no network or filesystem access happens here.

mod error;
mod grammar;
mod spec;

pub use error::ParseError;
pub use grammar::parse;
pub use spec::{Host, Reference, is_git_provider};

#[cfg(test)]
mod tests;
