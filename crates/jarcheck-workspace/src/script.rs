use serde::{Deserialize, Serialize};

/// Shell dialect of the generated launcher script.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFlavor {
    /// `run.bat`, executed with `cmd /c`.
    Batch,
    /// `run.sh`, executed with `sh`.
    Posix,
}

impl ScriptFlavor {
    pub fn native() -> Self {
        if cfg!(windows) {
            ScriptFlavor::Batch
        } else {
            ScriptFlavor::Posix
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ScriptFlavor::Batch => "run.bat",
            ScriptFlavor::Posix => "run.sh",
        }
    }
}

/// Fixed invocation template; only the artifact name varies between tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LauncherScript {
    pub flavor: ScriptFlavor,
    pub java: String,
    pub heap_flag: String,
}

impl Default for LauncherScript {
    fn default() -> Self {
        Self {
            flavor: ScriptFlavor::native(),
            java: "java".to_string(),
            heap_flag: "-Xmx1G".to_string(),
        }
    }
}

impl LauncherScript {
    pub fn render(&self, artifact_name: &str) -> String {
        match self.flavor {
            ScriptFlavor::Batch => format!("@echo off\n{} {} -jar {}\n", self.java, self.heap_flag, artifact_name),
            ScriptFlavor::Posix => format!(
                "#!/bin/sh\nexec {} {} -jar '{}'\n",
                self.java,
                self.heap_flag,
                artifact_name.replace('\'', r"'\''")
            ),
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.flavor.file_name()
    }
}
