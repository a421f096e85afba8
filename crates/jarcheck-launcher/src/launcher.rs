use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

use crate::{event::LaunchEvent, shell::shell_command};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("a server is already running; stop it first")]
    AlreadyRunning,
    #[error("launcher script not found: {}", .0.display())]
    ScriptMissing(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    Requested,
    /// A stop was already requested and the process has not exited yet.
    AlreadyStopping,
    NotRunning,
}

#[derive(Clone, Copy, Debug)]
pub struct LaunchOptions {
    /// How long a politely terminated server gets before it is killed.
    pub stop_grace: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self { stop_grace: Duration::from_secs(5) }
    }
}

struct Slot {
    generation: u64,
    pid: Option<u32>,
    /// Taken by the first stop request; `None` means the process is shutting down.
    stop_tx: Option<oneshot::Sender<()>>,
}

#[derive(Default)]
struct State {
    next_generation: u64,
    active: Option<Slot>,
}

/// Owns at most one server process at a time.
///
/// The process itself lives inside a supervisor task; the launcher only keeps
/// a slot describing it. The slot stays occupied until the process has
/// actually exited, including the grace period after a stop request. Every
/// launch gets a generation number so a supervisor never clears a slot that
/// belongs to a newer launch.
#[derive(Clone)]
pub struct Launcher {
    state: Arc<Mutex<State>>,
    events: mpsc::UnboundedSender<LaunchEvent>,
    options: LaunchOptions,
}

impl Launcher {
    pub fn new(options: LaunchOptions) -> (Self, mpsc::UnboundedReceiver<LaunchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let launcher = Self {
            state: Arc::new(Mutex::new(State::default())),
            events: tx,
            options,
        };
        (launcher, rx)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // the state stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True from `start` until the supervisor has seen the process exit.
    pub fn is_running(&self) -> bool {
        self.lock().active.is_some()
    }

    pub fn is_stopping(&self) -> bool {
        self.lock().active.as_ref().is_some_and(|s| s.stop_tx.is_none())
    }

    pub fn pid(&self) -> Option<u32> {
        self.lock().active.as_ref().and_then(|s| s.pid)
    }

    /// Claim the slot and hand the spawn to a background task. Returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, workdir: &Path, script: &Path) -> Result<(), LaunchError> {
        if !script.is_file() {
            return Err(LaunchError::ScriptMissing(script.to_path_buf()));
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let generation = {
            let mut state = self.lock();
            if state.active.is_some() {
                return Err(LaunchError::AlreadyRunning);
            }
            state.next_generation += 1;
            let generation = state.next_generation;
            state.active = Some(Slot { generation, pid: None, stop_tx: Some(stop_tx) });
            generation
        };

        tracing::info!(script = %script.display(), generation, "launching server");
        let command = shell_command(workdir, script);
        tokio::spawn(supervise(
            Arc::clone(&self.state),
            self.events.clone(),
            generation,
            command,
            stop_rx,
            self.options.stop_grace,
        ));
        Ok(())
    }

    /// Ask the supervisor to terminate the server.
    ///
    /// Does not wait for the exit. The slot is freed by the supervisor, which
    /// then reports [`LaunchEvent::Stopped`].
    pub fn stop(&self) -> StopOutcome {
        let mut state = self.lock();
        let Some(slot) = state.active.as_mut() else {
            return StopOutcome::NotRunning;
        };
        let Some(tx) = slot.stop_tx.take() else {
            return StopOutcome::AlreadyStopping;
        };
        let _ = tx.send(());
        tracing::info!(generation = slot.generation, pid = ?slot.pid, "stop requested");
        StopOutcome::Requested
    }
}

async fn supervise(
    state: Arc<Mutex<State>>,
    events: mpsc::UnboundedSender<LaunchEvent>,
    generation: u64,
    mut command: Command,
    mut stop_rx: oneshot::Receiver<()>,
    grace: Duration,
) {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(error = %e, "spawn failed");
            release(&state, generation);
            let _ = events.send(LaunchEvent::SpawnFailed { error: e.to_string() });
            return;
        }
    };

    let pid = child.id();
    {
        let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = guard.active.as_mut().filter(|s| s.generation == generation) {
            slot.pid = pid;
        }
    }
    let _ = events.send(LaunchEvent::Started { pid });

    tokio::select! {
        status = child.wait() => {
            release(&state, generation);
            let event = match status {
                Ok(s) => LaunchEvent::Exited { code: s.code() },
                Err(e) => LaunchEvent::KillFailed { error: format!("wait failed: {e}") },
            };
            tracing::info!(?pid, ?event, "server exited");
            let _ = events.send(event);
        }
        _ = &mut stop_rx => {
            let result = terminate(&mut child, grace).await;
            release(&state, generation);
            let event = match result {
                Ok(s) => LaunchEvent::Stopped { code: s.code() },
                Err(e) => LaunchEvent::KillFailed { error: e.to_string() },
            };
            tracing::info!(?pid, ?event, "server stopped");
            let _ = events.send(event);
        }
    }
}

fn release(state: &Mutex<State>, generation: u64) {
    let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
    if guard.active.as_ref().is_some_and(|s| s.generation == generation) {
        guard.active = None;
    }
}

/// SIGTERM first where available, then a hard kill once `grace` runs out.
async fn terminate(child: &mut Child, grace: Duration) -> std::io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                Ok(()) => {
                    if let Ok(status) = tokio::time::timeout(grace, child.wait()).await {
                        return status;
                    }
                    tracing::warn!(pid, "server ignored SIGTERM, killing");
                }
                Err(errno) => tracing::warn!(pid, error = %errno, "SIGTERM failed, killing"),
            }
        }
    }
    #[cfg(not(unix))]
    let _ = grace;

    child.kill().await?;
    child.wait().await
}
