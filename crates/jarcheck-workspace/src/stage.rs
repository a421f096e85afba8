use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{copy::merge_dir, script::LauncherScript};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("invalid artifact name `{0}`")]
    InvalidArtifactName(String),
    #[error("artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),
}

/// Outcome of merging the support directory into a staged workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SupportCopy {
    Merged { files: usize },
    Missing,
}

#[derive(Clone, Debug)]
pub struct StageReport {
    pub artifact: PathBuf,
    pub script: PathBuf,
    pub support: SupportCopy,
}

/// Scratch directory layout: artifacts come from `source_dir`, support files
/// from `support_dir`, and everything lands in `root`.
#[derive(Clone, Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub support_dir: PathBuf,
    pub script: LauncherScript,
}

impl Workspace {
    pub fn new(root: PathBuf, source_dir: PathBuf, support_dir: PathBuf, script: LauncherScript) -> Self {
        Self { root, source_dir, support_dir, script }
    }

    pub fn script_path(&self) -> PathBuf {
        self.root.join(self.script.file_name())
    }

    /// Delete and recreate the scratch directory. Safe to call repeatedly.
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root).with_context(|| format!("remove {}", self.root.display()))?;
        }
        std::fs::create_dir_all(&self.root).with_context(|| format!("create {}", self.root.display()))?;
        Ok(())
    }

    /// Reset the workspace and materialize `artifact_name` into it.
    ///
    /// The artifact is copied before the launcher script is written, so a
    /// missing artifact leaves an empty workspace rather than a script that
    /// points at nothing.
    pub fn stage(&self, artifact_name: &str) -> Result<StageReport> {
        validate_artifact_name(artifact_name)?;
        self.reset()?;

        let src = self.source_dir.join(artifact_name);
        if !src.is_file() {
            return Err(WorkspaceError::ArtifactMissing(src).into());
        }

        let artifact = self.root.join(artifact_name);
        std::fs::copy(&src, &artifact).with_context(|| format!("copy {} -> {}", src.display(), artifact.display()))?;
        tracing::info!(artifact = artifact_name, "artifact copied to workspace");

        let script = self.script_path();
        write_script(&script, &self.script.render(artifact_name))?;
        tracing::info!(script = %script.display(), "launcher script written");

        let support = if self.support_dir.is_dir() {
            let files = merge_dir(&self.support_dir, &self.root)?;
            SupportCopy::Merged { files }
        } else {
            tracing::info!(dir = %self.support_dir.display(), "support directory not found, skipping");
            SupportCopy::Missing
        };

        Ok(StageReport { artifact, script, support })
    }
}

fn validate_artifact_name(name: &str) -> Result<(), WorkspaceError> {
    let path = Path::new(name);
    let single_component = path.components().count() == 1 && path.file_name().is_some();
    if name.is_empty() || !single_component || name.contains(|c: char| c == '/' || c == '\\') {
        return Err(WorkspaceError::InvalidArtifactName(name.to_string()));
    }
    Ok(())
}

fn write_script(path: &Path, body: &str) -> Result<()> {
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
