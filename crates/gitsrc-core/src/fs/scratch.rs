use std::path::Path;

use anyhow::Context;
use tempfile::TempDir;
use tracing::debug;

/// Exclusively owned temporary directory, removed when dropped.
///
/// Each instance gets a unique name under its root, so concurrent callers
/// sharing a root never collide.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a scratch directory under `root`, or the system temp dir when `None`.
    pub fn create(root: Option<&Path>, prefix: &str) -> anyhow::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root).with_context(|| {
                    format!("Failed to create scratch root: {}", root.display())
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .with_context(|| format!("Failed to create scratch directory with prefix {prefix}"))?;

        debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        debug!(path = %self.dir.path().display(), "Removing scratch directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_on_drop() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchDir::create(Some(root.path()), "git-resources").unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::write(path.join("file"), "x").unwrap();
        assert!(path.exists());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("git-resources")
        );

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_dirs_are_distinct() {
        let root = TempDir::new().unwrap();
        let first = ScratchDir::create(Some(root.path()), "git-resources").unwrap();
        let second = ScratchDir::create(Some(root.path()), "git-resources").unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn missing_root_is_created() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        let scratch = ScratchDir::create(Some(&nested), "x").unwrap();
        assert!(scratch.path().starts_with(&nested));
    }
}
