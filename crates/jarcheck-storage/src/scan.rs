use std::path::Path;

use anyhow::{Context, Result};

/// Names of files in `dir` ending with `extension`, sorted. Symlinks to files count.
///
/// The directory is created when it does not exist yet, in which case the scan is empty.
pub fn scan_artifacts(dir: &Path, extension: &str) -> Result<Vec<String>> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        tracing::info!(dir = %dir.display(), "created missing artifact directory");
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        // non-UTF-8 names cannot round-trip through the snapshot
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.ends_with(extension) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
