//! Reference and host types.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Serialize, Serializer};

use super::grammar::Location;

/// Placeholder written in place of a token wherever a reference is displayed.
const REDACTED: &str = "***";

/// Characters left as-is when a value is embedded as a single GitLab API path segment.
const API_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Supported source-control hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Host {
    GitHub,
    GitHubRaw,
    GitLab,
    Bitbucket,
}

impl Host {
    pub const ALL: [Host; 4] = [Host::GitHub, Host::GitHubRaw, Host::GitLab, Host::Bitbucket];

    /// Match a URL host name against the supported hosts.
    pub fn from_host_str(host: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_str() == host)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Host::GitHub => "github.com",
            Host::GitHubRaw => "raw.githubusercontent.com",
            Host::GitLab => "gitlab.com",
            Host::Bitbucket => "bitbucket.org",
        }
    }

    /// Host used as a git remote. Raw-content hosts never serve clones.
    pub fn clone_host(self) -> Self {
        match self {
            Host::GitHubRaw => Host::GitHub,
            other => other,
        }
    }

    /// Environment variable conventionally holding a token for this provider.
    pub fn token_env_var(self) -> &'static str {
        match self {
            Host::GitHub | Host::GitHubRaw => "GITHUB_TOKEN",
            Host::GitLab => "GITLAB_TOKEN",
            Host::Bitbucket => "BITBUCKET_TOKEN",
        }
    }

    /// User name paired with a token in an authenticated clone URL.
    fn token_user(self) -> &'static str {
        match self {
            Host::Bitbucket => "x-token-auth",
            _ => "token",
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Host {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Check whether a host name belongs to a supported git provider.
pub fn is_git_provider(host: &str) -> bool {
    Host::from_host_str(host).is_some()
}

/// A provider URL decomposed into host, owner, repository, branch and path.
///
/// References are only produced by [`parse`](super::parse). The token is not
/// part of a reference's identity: equality ignores it and it is never
/// serialized or printed.
#[derive(Clone, Serialize)]
pub struct Reference {
    protocol: String,
    host: Host,
    owner: String,
    repo: String,
    branch: String,
    path: String,
    is_file: bool,
    #[serde(skip)]
    token: Option<String>,
}

impl Reference {
    pub(super) fn from_location(protocol: &str, host: Host, location: Location) -> Self {
        Self {
            protocol: protocol.to_string(),
            host,
            owner: location.owner,
            repo: location.repo,
            branch: location.branch,
            path: location.path,
            is_file: location.is_file,
            token: None,
        }
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> Host {
        self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Branch named by the URL; empty for a bare-repository reference.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Path inside the repository; empty for a bare-repository reference.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the URL targets a single file. Only meaningful when `path` is set.
    pub fn is_file(&self) -> bool {
        self.is_file
    }

    /// True when the URL names only a repository.
    pub fn is_repository_root(&self) -> bool {
        self.branch.is_empty() && self.path.is_empty()
    }

    pub fn is_git_provider_repo(&self) -> bool {
        is_git_provider(self.host.as_str())
    }

    /// The validated token, if one has been attached.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Attach a token that has already been validated. An empty token clears it.
    pub(crate) fn with_token(mut self, token: &str) -> Self {
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    pub(crate) fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    /// Remote URL handed to `git clone`, including the token when one is set.
    pub fn clone_url(&self) -> String {
        self.remote_url(self.token.as_deref())
    }

    /// Remote URL safe for logs: the token, if any, is replaced by a placeholder.
    pub fn redacted_clone_url(&self) -> String {
        self.remote_url(self.token.as_ref().map(|_| REDACTED))
    }

    fn remote_url(&self, secret: Option<&str>) -> String {
        let host = self.host.clone_host();
        match secret {
            None => format!(
                "{}://{}/{}/{}.git",
                self.protocol, host, self.owner, self.repo
            ),
            Some(secret) => format!(
                "{}://{}:{}@{}/{}/{}.git",
                self.protocol,
                self.host.token_user(),
                secret,
                host,
                self.owner,
                self.repo
            ),
        }
    }

    /// Repository metadata endpoint used to probe access.
    pub fn metadata_api_url(&self) -> String {
        match self.host {
            Host::GitHub | Host::GitHubRaw => {
                format!("https://api.github.com/repos/{}/{}", self.owner, self.repo)
            }
            Host::GitLab => format!(
                "https://gitlab.com/api/v4/projects/{}",
                self.gitlab_project_id()
            ),
            Host::Bitbucket => format!(
                "https://api.bitbucket.org/2.0/repositories/{}/{}",
                self.owner, self.repo
            ),
        }
    }

    /// Endpoint serving the raw content of the referenced file.
    pub fn raw_file_api(&self) -> String {
        match self.host {
            Host::GitHub | Host::GitHubRaw => format!(
                "https://raw.githubusercontent.com/{}/{}/{}/{}",
                self.owner, self.repo, self.branch, self.path
            ),
            Host::GitLab => {
                let mut url = format!(
                    "https://gitlab.com/api/v4/projects/{}/repository/files/{}/raw",
                    self.gitlab_project_id(),
                    utf8_percent_encode(&self.path, API_SEGMENT_SET)
                );
                if !self.branch.is_empty() {
                    url.push_str("?ref=");
                    url.push_str(&utf8_percent_encode(&self.branch, API_SEGMENT_SET).to_string());
                }
                url
            }
            Host::Bitbucket => format!(
                "https://api.bitbucket.org/2.0/repositories/{}/{}/src/{}/{}",
                self.owner, self.repo, self.branch, self.path
            ),
        }
    }

    /// `owner/repo` as a single encoded path segment (`owner%2Frepo`).
    fn gitlab_project_id(&self) -> String {
        let project = format!("{}/{}", self.owner, self.repo);
        utf8_percent_encode(&project, API_SEGMENT_SET).to_string()
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.protocol == other.protocol
            && self.host == other.host
            && self.owner == other.owner
            && self.repo == other.repo
            && self.branch == other.branch
            && self.path == other.path
            && self.is_file == other.is_file
    }
}

impl Eq for Reference {}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("path", &self.path)
            .field("is_file", &self.is_file)
            .field("token", &self.token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.repo)?;
        if !self.is_repository_root() {
            write!(f, "@{}/{}", self.branch, self.path)?;
        }
        Ok(())
    }
}
