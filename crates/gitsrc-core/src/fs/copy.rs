use std::path::Path;

use anyhow::Context;
use tracing::debug;

/// Copy the contents of `src` into `dst`, recursively, skipping `.git` directories.
///
/// Symlinks below `src` are skipped, never followed. `dst` is created if needed. Files already present in `dst` are overwritten.
/// Returns the number of files copied.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> anyhow::Result<usize> {
    debug!(src = %src.display(), dst = %dst.display(), "Copying directory contents");
    std::fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
    copy_tree_filtered(src, dst)
}

fn copy_tree_filtered(src: &Path, dst: &Path) -> anyhow::Result<usize> {
    let mut copied = 0;
    let entries = std::fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        if file_name == ".git" {
            continue;
        }
        let src_path = entry.path();
        let dst_path = dst.join(&file_name);
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            debug!(path = %src_path.display(), "Skipping symlink");
            continue;
        }
        if file_type.is_dir() {
            std::fs::create_dir_all(&dst_path).with_context(|| {
                format!("Failed to create directory: {}", dst_path.display())
            })?;
            copied += copy_tree_filtered(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
