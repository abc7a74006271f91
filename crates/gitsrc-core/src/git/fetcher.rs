//! Git fetcher for cloning referenced repositories.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::reference::Reference;

use super::runner::{ProcessError, ProcessRunner, SupportedCommand};

/// Whether a clone was attempted with credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneAuth {
    Anonymous,
    Token,
}

impl fmt::Display for CloneAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneAuth::Anonymous => f.write_str(
                "without a token, ensure that a token is set if the repo is private",
            ),
            CloneAuth::Token => {
                f.write_str("with token, ensure that the url and token is correct")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("failed to clone repo, destination directory: '{}' does not exist", .0.display())]
    DestinationMissing(PathBuf),

    #[error("failed to clone repo {auth}. error: {source}")]
    CloneFailed {
        auth: CloneAuth,
        #[source]
        source: ProcessError,
    },
}

impl CloneError {
    /// True when the failed clone was attempted with a token.
    pub fn with_token(&self) -> bool {
        matches!(
            self,
            CloneError::CloneFailed {
                auth: CloneAuth::Token,
                ..
            }
        )
    }
}

/// Clones repositories named by a [`Reference`].
#[derive(Clone)]
pub struct GitFetcher {
    runner: Arc<dyn ProcessRunner>,
    checkout_branch: bool,
}

impl GitFetcher {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            checkout_branch: false,
        }
    }

    /// Check out the reference's branch instead of the remote default branch.
    pub fn with_branch_checkout(mut self, checkout_branch: bool) -> Self {
        self.checkout_branch = checkout_branch;
        self
    }

    /// Clone the whole repository into `dest_dir`, which must already exist.
    pub fn clone_into(&self, reference: &Reference, dest_dir: &Path) -> Result<(), CloneError> {
        if !dest_dir.exists() {
            return Err(CloneError::DestinationMissing(dest_dir.to_path_buf()));
        }

        let remote = reference.clone_url();
        let mut args = vec!["clone"];
        if self.checkout_branch && !reference.branch().is_empty() {
            args.extend(["--branch", reference.branch()]);
        }
        args.extend([remote.as_str(), "."]);

        info!(
            remote = %reference.redacted_clone_url(),
            dest = %dest_dir.display(),
            "Cloning repository"
        );

        let command = SupportedCommand::Git.program();
        self.runner.run(dest_dir, command, &args).map(|_| ()).map_err(|err| {
            let auth = match reference.token() {
                Some(_) => CloneAuth::Token,
                None => CloneAuth::Anonymous,
            };
            let source = match reference.token() {
                Some(token) => err.redact(token),
                None => err,
            };
            warn!(%reference, error = %source, "Clone failed");
            CloneError::CloneFailed { auth, source }
        })
    }
}

impl fmt::Debug for GitFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitFetcher")
            .field("checkout_branch", &self.checkout_branch)
            .finish_non_exhaustive()
    }
}
