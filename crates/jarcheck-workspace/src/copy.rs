use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Copy the contents of `src` into `dest`, merging into directories that already exist.
///
/// Files overwrite same-named files in `dest`. Returns the number of files copied.
pub fn merge_dir(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).with_context(|| format!("create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("copy {} -> {}", entry.path().display(), target.display()))?;
            tracing::debug!(file = %rel.display(), "support file copied");
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn merges_into_existing_subdirectories() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("plugins")).unwrap();
        std::fs::write(src.path().join("plugins/a.yml"), "new").unwrap();
        std::fs::write(src.path().join("server.properties"), "motd=x").unwrap();

        std::fs::create_dir_all(dest.path().join("plugins")).unwrap();
        std::fs::write(dest.path().join("plugins/keep.yml"), "keep").unwrap();
        std::fs::write(dest.path().join("plugins/a.yml"), "old").unwrap();

        assert_eq!(merge_dir(src.path(), dest.path()).unwrap(), 2);
        assert_eq!(std::fs::read_to_string(dest.path().join("plugins/a.yml")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dest.path().join("plugins/keep.yml")).unwrap(), "keep");
        assert!(dest.path().join("server.properties").exists());
    }
}
