//! Resource extraction from provider URLs.
//!
//! Composes parse, access classification, clone and copy into one call that
//! places the directory holding a referenced file into a destination.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::access::{AccessClassifier, AuthError};
use crate::context::FetchContext;
use crate::fs::{ScratchDir, copy_dir_contents};
use crate::git::{CloneError, GitFetcher};
use crate::reference::{ParseError, Reference, parse};

const DEFAULT_SCRATCH_PREFIX: &str = "git-resources";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("url does not point to a file in a supported git repository: {0}")]
    NotAFile(String),

    #[error("path escapes the repository: {0}")]
    UnsafePath(String),

    #[error("failed to create scratch directory: {source}")]
    Scratch {
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error("failed to copy resources to {}: {source}", dest.display())]
    Copy {
        dest: PathBuf,
        #[source]
        source: BoxError,
    },
}

/// Fetches the directory containing a referenced file into a destination.
#[derive(Debug, Clone)]
pub struct ResourceExtractor {
    classifier: AccessClassifier,
    fetcher: GitFetcher,
    scratch_root: Option<PathBuf>,
    scratch_prefix: String,
    env_token_fallback: bool,
}

impl ResourceExtractor {
    pub fn new(classifier: AccessClassifier, fetcher: GitFetcher) -> Self {
        Self {
            classifier,
            fetcher,
            scratch_root: None,
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            env_token_fallback: false,
        }
    }

    /// Parent directory for scratch clones. Defaults to the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn with_scratch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scratch_prefix = prefix.into();
        self
    }

    /// Fall back to the provider's token environment variable when no token is given.
    pub fn with_env_token_fallback(mut self, enabled: bool) -> Self {
        self.env_token_fallback = enabled;
        self
    }

    /// Download the directory holding the file `raw_url` points to into `dest_dir`.
    ///
    /// The repository is cloned into a scratch directory that is removed on
    /// every exit path. `token` is only validated and used when the repository
    /// is not publicly readable. Files copied before a failure are left in place.
    pub fn download_to_destination(
        &self,
        raw_url: &str,
        dest_dir: &Path,
        timeout_secs: Option<i64>,
        token: &str,
    ) -> Result<(), ExtractError> {
        let reference = parse(raw_url)?;
        if !reference.is_git_provider_repo() || !reference.is_file() {
            return Err(ExtractError::NotAFile(raw_url.to_string()));
        }
        let source_dir = containing_dir(reference.path())?;

        let scratch = ScratchDir::create(self.scratch_root.as_deref(), &self.scratch_prefix)
            .map_err(|e| ExtractError::Scratch { source: e.into() })?;

        let reference = if self.classifier.is_public(&reference, timeout_secs) {
            reference
        } else {
            let token = self.candidate_token(&reference, token);
            self.classifier.set_token(reference, &token, timeout_secs)?
        };

        self.fetcher.clone_into(&reference, scratch.path())?;

        let source = contained_source(scratch.path(), &source_dir)?;
        info!(
            %reference,
            dest = %dest_dir.display(),
            "Copying repository resources"
        );
        let copied = copy_dir_contents(&source, dest_dir).map_err(|e| ExtractError::Copy {
            dest: dest_dir.to_path_buf(),
            source: e.into(),
        })?;
        debug!(copied, "Copied repository resources");

        Ok(())
    }

    fn candidate_token(&self, reference: &Reference, token: &str) -> String {
        if !token.is_empty() || !self.env_token_fallback {
            return token.to_string();
        }
        let var = reference.host().token_env_var();
        match std::env::var(var) {
            Ok(value) => {
                debug!(var, "Using token from environment");
                value
            }
            Err(_) => String::new(),
        }
    }
}

/// Download using the default HTTP transport, `git` runner and configuration.
pub fn download_to_destination(
    raw_url: &str,
    dest_dir: &Path,
    timeout_secs: Option<i64>,
    token: &str,
) -> Result<(), ExtractError> {
    FetchContext::default()
        .resource_extractor()
        .download_to_destination(raw_url, dest_dir, timeout_secs, token)
}

/// Directory containing `path`, relative to the repository root.
fn containing_dir(path: &str) -> Result<PathBuf, ExtractError> {
    let path = Path::new(path);
    if !path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
    {
        return Err(ExtractError::UnsafePath(path.display().to_string()));
    }
    Ok(path.parent().map(Path::to_path_buf).unwrap_or_default())
}

/// Resolve `relative` under `root`, refusing anything a symlink leads out of `root`.
///
/// A source that does not exist is returned as-is so the copy reports it.
fn contained_source(root: &Path, relative: &Path) -> Result<PathBuf, ExtractError> {
    let source = root.join(relative);
    let (Ok(real_root), Ok(real_source)) = (root.canonicalize(), source.canonicalize()) else {
        return Ok(source);
    };
    if !real_source.starts_with(&real_root) {
        return Err(ExtractError::UnsafePath(relative.display().to_string()));
    }
    Ok(real_source)
}
