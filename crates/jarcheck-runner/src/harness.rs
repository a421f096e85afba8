use std::path::PathBuf;

use anyhow::{anyhow, Result};
use jarcheck_core::{Progress, Registry, TestStatus};
use jarcheck_launcher::{LaunchEvent, Launcher, StopOutcome};
use jarcheck_report::Reporter;
use jarcheck_storage::{scan_artifacts, JsonFileStore, SnapshotStore};
use jarcheck_workspace::{SupportCopy, Workspace};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{Config, FeedbackLog};

/// Application state behind the operator console.
///
/// Every operation catches its own errors and turns them into a feedback
/// line; the returned bool only says whether it completed.
pub struct Harness {
    pub base_dir: PathBuf,
    pub cfg: Config,
    registry: Registry,
    store: Box<dyn SnapshotStore>,
    workspace: Workspace,
    launcher: Launcher,
    reporter: Reporter,
    feedback: FeedbackLog,
    /// Set by `next_test` while the previous server is still shutting down.
    stage_on_exit: bool,
}

impl Harness {
    pub fn open(base_dir: PathBuf, cfg: Config) -> (Self, UnboundedReceiver<LaunchEvent>) {
        let store = Box::new(JsonFileStore::new(cfg.snapshot_path(&base_dir)));
        Self::with_store(base_dir, cfg, store)
    }

    pub fn with_store(base_dir: PathBuf, cfg: Config, store: Box<dyn SnapshotStore>) -> (Self, UnboundedReceiver<LaunchEvent>) {
        let workspace = Workspace::new(
            cfg.test_dir(&base_dir),
            cfg.jars_dir(&base_dir),
            cfg.configs_dir(&base_dir),
            cfg.launcher_script(),
        );
        let reporter = Reporter::new(cfg.snapshot_path(&base_dir), cfg.log_path(&base_dir));
        let (launcher, events) = Launcher::new(cfg.launch_options());
        let harness = Self {
            base_dir,
            cfg,
            registry: Registry::default(),
            store,
            workspace,
            launcher,
            reporter,
            feedback: FeedbackLog::new(),
            stage_on_exit: false,
        };
        (harness, events)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn feedback(&self) -> &FeedbackLog {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut FeedbackLog {
        &mut self.feedback
    }

    /// True until a launched server has exited, including while it is being stopped.
    pub fn is_server_running(&self) -> bool {
        self.launcher.is_running()
    }

    pub fn is_server_stopping(&self) -> bool {
        self.launcher.is_stopping()
    }

    pub fn progress(&self) -> Progress {
        self.registry.progress()
    }

    fn report(&mut self, result: Result<String>) -> bool {
        match result {
            Ok(message) => {
                self.feedback.info(message);
                true
            }
            Err(e) => {
                self.feedback.error(format!("{e:#}"));
                false
            }
        }
    }

    /// Rebuild the registry from the artifact directory and persist it.
    /// Previous verdicts are discarded.
    pub fn load_jars(&mut self) -> bool {
        let result = self.try_load_jars();
        self.report(result)
    }

    fn try_load_jars(&mut self) -> Result<String> {
        let names = scan_artifacts(&self.workspace.source_dir, &self.cfg.launch.artifact_extension)?;
        let registry = Registry::from_artifacts(names);
        self.store.save(registry.records())?;
        self.registry = registry;
        Ok(format!(
            "Snapshot '{}' generated with {} jar(s).",
            self.reporter.snapshot_path.display(),
            self.registry.len()
        ))
    }

    /// Restore the registry from the persisted snapshot; no test is active afterwards.
    pub fn open_snapshot(&mut self) -> bool {
        let result = self.try_open_snapshot();
        self.report(result)
    }

    fn try_open_snapshot(&mut self) -> Result<String> {
        let records = self.store.load()?;
        self.registry = Registry::from_records(records)?;
        Ok(format!("Loaded {} record(s) from snapshot.", self.registry.len()))
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.launcher.is_stopping() {
            return Err(anyhow!("the server is still shutting down; wait for it to exit"));
        }
        if self.launcher.is_running() {
            return Err(anyhow!("a server is still running; stop it first"));
        }
        if self.stage_on_exit {
            return Err(anyhow!("the next test is waiting to be staged"));
        }
        Ok(())
    }

    fn stage_current(&mut self) -> Result<String> {
        self.ensure_idle()?;
        let artifact = self
            .registry
            .current_record()
            .map(|r| r.artifact_name.clone())
            .ok_or_else(|| anyhow!("no jar file is currently set for testing"))?;

        let report = self.workspace.stage(&artifact)?;
        match report.support {
            SupportCopy::Merged { files } => {
                self.feedback.info(format!("Support files copied to the test folder ({files} file(s))."))
            }
            SupportCopy::Missing => self.feedback.info("Support folder not found. Skipping copy."),
        }
        Ok(format!(
            "Staged {artifact}; launcher script {} created.",
            report.script.display()
        ))
    }

    /// Put the cursor on the first record and stage it.
    pub fn start_test(&mut self) -> bool {
        let result = self.try_start_test();
        self.report(result)
    }

    fn try_start_test(&mut self) -> Result<String> {
        self.ensure_idle()?;
        self.registry.begin()?;
        self.stage_current()
    }

    /// Launch the staged server in the background.
    pub fn start_server(&mut self) -> bool {
        let result = if self.stage_on_exit {
            Err(anyhow!("the next test is waiting to be staged"))
        } else {
            self.launcher
                .start(&self.workspace.root, &self.workspace.script_path())
                .map(|()| "Server launch requested.".to_string())
                .map_err(Into::into)
        };
        self.report(result)
    }

    pub fn stop_server(&mut self) -> bool {
        match self.launcher.stop() {
            StopOutcome::Requested => {
                self.feedback.info("Server stop requested.");
                true
            }
            StopOutcome::AlreadyStopping => {
                self.feedback.info("Server is already shutting down.");
                true
            }
            StopOutcome::NotRunning => {
                self.feedback.info("No server process is currently running.");
                false
            }
        }
    }

    /// Verdict for the active test.
    pub fn update_status(&mut self, status: TestStatus, notes: &str) -> bool {
        let result = self
            .registry
            .current()
            .ok_or_else(|| anyhow!("no jar file is currently set for testing"))
            .and_then(|index| self.try_record_verdict(index, status, notes));
        self.report(result)
    }

    /// Verdict for an arbitrary record; the registry is untouched when `index` is out of range.
    pub fn record_verdict(&mut self, index: usize, status: TestStatus, notes: &str) -> bool {
        let result = self.try_record_verdict(index, status, notes);
        self.report(result)
    }

    fn try_record_verdict(&mut self, index: usize, status: TestStatus, notes: &str) -> Result<String> {
        self.registry.record_verdict(index, status, notes)?;
        self.store.save(self.registry.records())?;
        Ok("Status and notes updated successfully.".to_string())
    }

    /// Stop any live server, move to the next pending record and stage it.
    ///
    /// With a live server the staging waits for its exit event, see
    /// [`Harness::on_launch_event`].
    pub fn next_test(&mut self) -> bool {
        let result = self.try_next_test();
        self.report(result)
    }

    fn try_next_test(&mut self) -> Result<String> {
        if self.stage_on_exit {
            return Err(anyhow!("the next test is waiting to be staged"));
        }
        let live = self.launcher.is_running();
        if live {
            self.stop_server();
        }
        self.registry.advance()?;
        if live {
            self.stage_on_exit = true;
            let artifact = self.registry.current_record().map(|r| r.artifact_name.as_str()).unwrap_or_default();
            return Ok(format!("{artifact} will be staged once the server has exited."));
        }
        self.stage_current()
    }

    /// Empty the workspace without staging anything.
    pub fn reset_workspace(&mut self) -> bool {
        let result = self
            .ensure_idle()
            .and_then(|()| self.workspace.reset())
            .map(|()| format!("Workspace {} reset.", self.workspace.root.display()));
        self.report(result)
    }

    pub fn generate_log(&mut self) -> bool {
        let result = self
            .reporter
            .export_log(self.registry.records())
            .map(|()| format!("Log file '{}' generated successfully.", self.reporter.log_path.display()));
        self.report(result)
    }

    pub fn export_snapshot(&mut self) -> bool {
        let result = self
            .reporter
            .export_snapshot(self.registry.records())
            .map(|()| format!("Snapshot '{}' written.", self.reporter.snapshot_path.display()));
        self.report(result)
    }

    pub fn on_launch_event(&mut self, event: LaunchEvent) {
        match event {
            LaunchEvent::SpawnFailed { .. } | LaunchEvent::KillFailed { .. } => {
                tracing::warn!(?event, "launcher reported a failure");
            }
            _ => tracing::debug!(?event, "launch event"),
        }
        let finished = !matches!(event, LaunchEvent::Started { .. });
        self.feedback.info(event.to_string());

        if finished && self.stage_on_exit && !self.launcher.is_running() {
            self.stage_on_exit = false;
            let result = self.stage_current();
            self.report(result);
        }
    }

    /// Stop a live server before the process exits.
    pub fn shutdown(&mut self) {
        if self.launcher.is_running() {
            self.stop_server();
        }
    }
}
