//! Provider URL grammars.
//!
//! Each host has its own path layout:
//! - GitHub: `<owner>/<repo>[/<tree|blob>/<branch>/<path>]`
//! - GitHub raw: `<owner>/<repo>/<branch>/<path>`
//! - GitLab: `<owner>/<repo>[/-/<blob|tree|raw>/<branch>/<path>]`
//! - Bitbucket: `<owner>/<repo>[/<src|raw>/<branch>/<path>]`
//!
//! The final `<path>` may itself contain slashes.

use percent_encoding::percent_decode_str;
use url::Url;

use super::error::ParseError;
use super::spec::{Host, Reference};

const GITHUB_LAYOUT: &str = "<owner>/<repo>/<tree or blob>/<branch>/<path/to/file/or/directory>";
const GITHUB_KEYWORDS: &str = "'tree' or 'blob'";
const GITLAB_LAYOUT: &str = "<blob or tree or raw>/<branch>/<path/to/file/or/directory>";
const GITLAB_KEYWORDS: &str = "'blob' or 'tree' or 'raw'";
const GITLAB_SEPARATOR: &str = "/-/";
const BITBUCKET_KEYWORDS: &str = "'raw' or 'src'";

/// Repository coordinates extracted by one of the grammars.
#[derive(Debug, Default)]
pub(super) struct Location {
    pub(super) owner: String,
    pub(super) repo: String,
    pub(super) branch: String,
    pub(super) path: String,
    pub(super) is_file: bool,
}

impl Location {
    fn repository(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            ..Self::default()
        }
    }

    fn target(mut self, branch: &str, path: &str, is_file: bool) -> Self {
        self.branch = branch.to_string();
        self.path = path.to_string();
        self.is_file = is_file;
        self
    }
}

/// Parse a GitHub, GitLab or Bitbucket URL into a [`Reference`].
///
/// # Example
/// ```
/// let reference = gitsrc_core::reference::parse(
///     "https://github.com/devfile/library/blob/main/devfile.yaml",
/// )
/// .unwrap();
/// assert_eq!(reference.owner(), "devfile");
/// assert_eq!(reference.path(), "devfile.yaml");
/// assert!(reference.is_file());
/// ```
pub fn parse(raw: &str) -> Result<Reference, ParseError> {
    let url = Url::parse(raw).map_err(|e| ParseError::InvalidUrl(format!("{raw} ({e})")))?;
    let host_name = match url.host_str() {
        Some(host) if !host.is_empty() && !url.scheme().is_empty() => host,
        _ => return Err(ParseError::InvalidUrl(raw.to_string())),
    };

    let decoded = percent_decode_str(url.path())
        .decode_utf8()
        .map_err(|e| ParseError::InvalidUrl(format!("{raw} ({e})")))?;
    let path = decoded.trim_start_matches('/').trim_end_matches('/');
    if path.is_empty() {
        return Err(ParseError::EmptyPath);
    }

    // Providers are only recognised on their default port.
    let host = match url.port() {
        None => Host::from_host_str(host_name)
            .ok_or_else(|| ParseError::UnsupportedHost(host_name.to_string()))?,
        Some(port) => return Err(ParseError::UnsupportedHost(format!("{host_name}:{port}"))),
    };

    let location = match host {
        Host::GitHubRaw => parse_github_raw(path)?,
        Host::GitHub => parse_github(path)?,
        Host::GitLab => parse_gitlab(path)?,
        Host::Bitbucket => parse_bitbucket(path)?,
    };

    Ok(Reference::from_location(url.scheme(), host, location))
}

fn parse_github_raw(path: &str) -> Result<Location, ParseError> {
    // Raw URLs carry no "blob"/"tree" keyword and always point at a file.
    match path.splitn(4, '/').collect::<Vec<_>>().as_slice() {
        [owner, repo, branch, file]
            if [owner, repo, branch, file].iter().all(|s| !s.is_empty()) =>
        {
            Ok(Location::repository(owner, repo).target(branch, file, true))
        }
        _ => Err(ParseError::MalformedRawPath(path.to_string())),
    }
}

fn parse_github(path: &str) -> Result<Location, ParseError> {
    let segments: Vec<&str> = path.splitn(5, '/').collect();
    let location = repository(&segments, path)?;
    if segments.len() == 2 {
        return Ok(location);
    }

    let is_file = match segments[2] {
        "tree" => false,
        "blob" => true,
        _ => return Err(malformed(GITHUB_KEYWORDS, path)),
    };

    match segments.as_slice() {
        [_, _, _, branch, target] if !branch.is_empty() && !target.is_empty() => {
            Ok(location.target(branch, target, is_file))
        }
        _ => Err(malformed(GITHUB_LAYOUT, path)),
    }
}

fn parse_gitlab(path: &str) -> Result<Location, ParseError> {
    let sections: Vec<&str> = path.split(GITLAB_SEPARATOR).collect();
    // Subgroups stay in the repo name: "group/sub/project" -> ("group", "sub/project").
    let prefix: Vec<&str> = sections[0].splitn(2, '/').collect();
    let location = repository(&prefix, path)?;
    // A lone "-" segment is the separator with its trailing slash trimmed away.
    if sections[0].split('/').any(|segment| segment == "-") {
        return Err(malformed(GITLAB_LAYOUT, path));
    }

    let suffix = match sections.as_slice() {
        [_] => return Ok(location),
        [_, suffix] => *suffix,
        _ => return Err(malformed(GITLAB_LAYOUT, path)),
    };

    let (keyword, branch, target) = match suffix.splitn(3, '/').collect::<Vec<_>>().as_slice() {
        [keyword, branch, target] => (*keyword, *branch, *target),
        _ => return Err(malformed(GITLAB_LAYOUT, path)),
    };
    if !matches!(keyword, "blob" | "tree" | "raw") {
        return Err(ParseError::UnknownPathKeyword {
            expected: GITLAB_KEYWORDS,
            path: path.to_string(),
        });
    }
    if branch.is_empty() || target.is_empty() {
        return Err(malformed(GITLAB_LAYOUT, path));
    }

    Ok(location.target(branch, target, has_extension(target)))
}

fn parse_bitbucket(path: &str) -> Result<Location, ParseError> {
    let segments: Vec<&str> = path.splitn(5, '/').collect();
    let location = repository(&segments, path)?;

    match segments.as_slice() {
        [_, _] => Ok(location),
        [_, _, keyword, branch, target] => {
            if !matches!(*keyword, "src" | "raw") {
                return Err(ParseError::UnknownPathKeyword {
                    expected: BITBUCKET_KEYWORDS,
                    path: path.to_string(),
                });
            }
            if branch.is_empty() || target.is_empty() {
                return Err(ParseError::IncompletePath(path.to_string()));
            }
            Ok(location.target(branch, target, has_extension(target)))
        }
        _ => Err(ParseError::IncompletePath(path.to_string())),
    }
}

/// Owner and repo from the first two segments, both required to be non-empty.
fn repository(segments: &[&str], path: &str) -> Result<Location, ParseError> {
    match segments {
        [owner, repo, ..] if !owner.is_empty() && !repo.is_empty() => {
            Ok(Location::repository(owner, repo))
        }
        _ => Err(ParseError::MissingRepository(path.to_string())),
    }
}

fn malformed(layout: &'static str, path: &str) -> ParseError {
    ParseError::MalformedPath {
        layout,
        path: path.to_string(),
    }
}

/// True when the last path segment ends in `.<something>`.
///
/// This is a heuristic: a directory may contain a dot and an extensionless
/// file looks like a directory.
pub(super) fn has_extension(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').is_some_and(|idx| idx + 1 < name.len())
}
