use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use jarcheck_launcher::LaunchOptions;
use jarcheck_workspace::{LauncherScript, ScriptFlavor};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub jars_dir: String,
    pub test_dir: String,
    pub configs_dir: String,
    pub snapshot: String,
    pub log: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            jars_dir: "jars".to_string(),
            test_dir: "test".to_string(),
            configs_dir: "configs".to_string(),
            snapshot: "output.json".to_string(),
            log: "test_output_log.txt".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LaunchConfig {
    pub java: String,
    pub heap_flag: String,
    pub artifact_extension: String,
    /// "batch" | "posix"; platform default when unset.
    pub script: Option<ScriptFlavor>,
    pub stop_grace_secs: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            heap_flag: "-Xmx1G".to_string(),
            artifact_extension: ".jar".to_string(),
            script: None,
            stop_grace_secs: 5,
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Defaults when `path` does not exist; a present but broken file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).context("serialize config")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("jarcheck.toml")
    }

    fn resolve(base_dir: &Path, raw: &str) -> PathBuf {
        let expanded = shellexpand::tilde(raw).to_string();
        let p = PathBuf::from(expanded);
        if p.is_absolute() {
            p
        } else {
            base_dir.join(p)
        }
    }

    pub fn jars_dir(&self, base_dir: &Path) -> PathBuf {
        Self::resolve(base_dir, &self.paths.jars_dir)
    }

    pub fn test_dir(&self, base_dir: &Path) -> PathBuf {
        Self::resolve(base_dir, &self.paths.test_dir)
    }

    pub fn configs_dir(&self, base_dir: &Path) -> PathBuf {
        Self::resolve(base_dir, &self.paths.configs_dir)
    }

    pub fn snapshot_path(&self, base_dir: &Path) -> PathBuf {
        Self::resolve(base_dir, &self.paths.snapshot)
    }

    pub fn log_path(&self, base_dir: &Path) -> PathBuf {
        Self::resolve(base_dir, &self.paths.log)
    }

    pub fn launcher_script(&self) -> LauncherScript {
        LauncherScript {
            flavor: self.launch.script.unwrap_or_else(ScriptFlavor::native),
            java: self.launch.java.clone(),
            heap_flag: self.launch.heap_flag.clone(),
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions { stop_grace: Duration::from_secs(self.launch.stop_grace_secs) }
    }
}
