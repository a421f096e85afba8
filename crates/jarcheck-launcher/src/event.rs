use std::fmt;

/// Lifecycle notifications emitted by the supervisor task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchEvent {
    Started { pid: Option<u32> },
    SpawnFailed { error: String },
    /// The process ended on its own.
    Exited { code: Option<i32> },
    /// The process ended after a stop request.
    Stopped { code: Option<i32> },
    KillFailed { error: String },
}

impl fmt::Display for LaunchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchEvent::Started { pid: Some(pid) } => write!(f, "Server started (pid {pid})."),
            LaunchEvent::Started { pid: None } => write!(f, "Server started."),
            LaunchEvent::SpawnFailed { error } => write!(f, "Error: failed to start server: {error}"),
            LaunchEvent::Exited { code } => write!(f, "Server exited on its own ({}).", describe_code(*code)),
            LaunchEvent::Stopped { code } => write!(f, "Server stopped ({}).", describe_code(*code)),
            LaunchEvent::KillFailed { error } => write!(f, "Error while killing the server: {error}"),
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}
