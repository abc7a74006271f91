//! Configuration schema for gitsrc.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::access::{DEFAULT_HTTP_TIMEOUT, resolve_timeout};

fn default_user_agent() -> String {
    concat!("gitsrc/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_scratch_prefix() -> String {
    "git-resources".to_string()
}

/// Settings for probing, cloning and extracting repository resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Probe timeout in seconds; non-positive values fall back to 30s
    pub http_timeout_secs: Option<i64>,

    /// Sent as the `Client` header on probes
    pub client_name: Option<String>,

    pub user_agent: String,

    /// Parent directory for scratch clones (system temp dir when unset)
    pub scratch_root: Option<PathBuf>,

    pub scratch_prefix: String,

    /// Read GITHUB_TOKEN / GITLAB_TOKEN / BITBUCKET_TOKEN when no token is supplied
    pub env_token_fallback: bool,

    /// Clone the referenced branch instead of the remote default branch
    pub checkout_branch: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: None,
            client_name: None,
            user_agent: default_user_agent(),
            scratch_root: None,
            scratch_prefix: default_scratch_prefix(),
            env_token_fallback: false,
            checkout_branch: false,
        }
    }
}

impl FetchConfig {
    /// Default probe timeout after applying `http_timeout_secs`.
    pub fn timeout(&self) -> Duration {
        resolve_timeout(self.http_timeout_secs, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("Invalid config: user_agent must not be empty");
        }
        if self.scratch_prefix.trim().is_empty() {
            anyhow::bail!("Invalid config: scratch_prefix must not be empty");
        }
        if self.scratch_prefix.contains(['/', '\\']) {
            anyhow::bail!(
                "Invalid config: scratch_prefix must not contain path separators: {}",
                self.scratch_prefix
            );
        }
        Ok(())
    }
}
