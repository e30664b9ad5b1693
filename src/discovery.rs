use crate::errors::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Which files a walk should yield.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Normalized extensions (lowercase, no dot). Empty matches every file.
    pub extensions: Vec<String>,
    /// Directory names to skip anywhere in the tree.
    pub exclude: Vec<String>,
    /// Apply `.gitignore` and hidden-file filtering.
    pub respect_gitignore: bool,
}

/// Recursively collects every file under `root` that matches `options`.
///
/// Paths are returned sorted so repeated runs report in the same order.
pub fn discover(root: &Path, options: &DiscoveryOptions) -> Result<Vec<PathBuf>> {
    ensure_dir(root)?;

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(options.respect_gitignore)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut files = Vec::new();
    for entry in walker.build() {
        let entry = entry?;
        let path = entry.path();

        if is_excluded(path, root, &options.exclude) {
            continue;
        }
        if path.is_file() && has_extension(path, &options.extensions) {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "discovery finished");
    Ok(files)
}

/// Rejects roots that are missing or not directories before walking.
pub fn ensure_dir(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(format!("{} is not a directory", root.display()).into());
    }
    Ok(())
}

fn is_excluded(path: &Path, root: &Path, exclude: &[String]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    // Only components below the root count, so a root inside an excluded
    // name is still walked.
    let relative = path.strip_prefix(root).unwrap_or(path);
    exclude
        .iter()
        .any(|ex| relative.components().any(|c| c.as_os_str() == ex.as_str()))
}

/// Determines if a file should be processed based on its extension.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    path.extension()
        .and_then(|os| os.to_str())
        .map(|s| extensions.contains(&s.to_lowercase()))
        .unwrap_or(false)
}
