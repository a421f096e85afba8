use anyhow::{anyhow, Context, Result};
use std::path::Path;

use crate::util::run_cmd;
use crate::Config;

/// Check that the harness can do its job from `base_dir`. Returns one line per passed check.
pub fn doctor(base_dir: &Path, cfg: &Config) -> Result<Vec<String>> {
    let mut report = Vec::new();

    let version = run_cmd(base_dir, &cfg.launch.java, &["-version"])
        .with_context(|| format!("`{}` not runnable; install a JRE or set launch.java", cfg.launch.java))?;
    let first = version.lines().next().unwrap_or_default();
    report.push(format!("java: {first}"));

    let jars = cfg.jars_dir(base_dir);
    if !jars.is_dir() {
        return Err(anyhow!("artifact directory {} does not exist; create it and drop jars in", jars.display()));
    }
    let found = jarcheck_storage::scan_artifacts(&jars, &cfg.launch.artifact_extension)?;
    report.push(format!("artifacts: {} in {}", found.len(), jars.display()));

    let configs = cfg.configs_dir(base_dir);
    if configs.is_dir() {
        report.push(format!("support files: {}", configs.display()));
    } else {
        // optional
        tracing::warn!(dir = %configs.display(), "support directory missing; workspaces will hold only the jar");
        report.push(format!("support files: none ({} missing)", configs.display()));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unrunnable_java_is_reported() {
        let dir = tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.launch.java = "definitely-not-a-java-binary".into();
        let err = doctor(dir.path(), &cfg).unwrap_err();
        assert!(format!("{err:#}").contains("definitely-not-a-java-binary"));
    }
}
