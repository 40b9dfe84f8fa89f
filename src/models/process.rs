//! Child Process Model
//!
//! Bookkeeping record for the catalog script child process: its lifecycle
//! state, pid, timestamps and exit code. The actual OS handle lives in the
//! process controller; this model is what the rest of the bridge inspects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the state of the child process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProcessState {
    /// Process has been created but not started
    #[default]
    Created,
    /// Process is currently running
    Running,
    /// Process has exited
    Exited,
}

/// Lifecycle record for a spawned child process
#[derive(Debug, Clone)]
pub struct ChildProcess {
    /// OS process identifier
    pub pid: Option<u32>,

    /// Current state of the process
    pub state: ProcessState,

    /// When the process was started
    pub start_time: Option<DateTime<Utc>>,

    /// When the process exited (if applicable)
    pub end_time: Option<DateTime<Utc>>,

    /// Exit code (if the process has exited)
    pub exit_code: Option<i32>,

    /// Command that was executed
    pub command: String,

    /// Arguments passed to the command
    pub args: Vec<String>,
}

impl ChildProcess {
    /// Create a new process record in the Created state
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self {
            pid: None,
            state: ProcessState::Created,
            start_time: None,
            end_time: None,
            exit_code: None,
            command,
            args,
        }
    }

    /// Mark the process as started with the given PID
    pub fn mark_started(&mut self, pid: u32) {
        self.pid = Some(pid);
        self.state = ProcessState::Running;
        self.start_time = Some(Utc::now());
    }

    /// Mark the process as exited with the given exit code
    pub fn mark_exited(&mut self, exit_code: i32) {
        self.state = ProcessState::Exited;
        self.end_time = Some(Utc::now());
        self.exit_code = Some(exit_code);
    }

    /// Check if the process is currently running
    pub fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    /// Check if the process has exited
    pub fn has_exited(&self) -> bool {
        matches!(self.state, ProcessState::Exited)
    }

    /// Check if the process exited successfully (exit code 0)
    pub fn exited_successfully(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Get the execution duration if the process has exited
    pub fn execution_duration(&self) -> Option<std::time::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                Some(end.signed_duration_since(start).to_std().unwrap_or_default())
            }
            _ => None,
        }
    }
}

impl Default for ChildProcess {
    fn default() -> Self {
        Self::new(String::new(), Vec::new())
    }
}

impl std::fmt::Display for ChildProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state_str = match self.state {
            ProcessState::Created => "Created",
            ProcessState::Running => "Running",
            ProcessState::Exited => "Exited",
        };
        let pid_str = self.pid.map_or("N/A".to_string(), |pid| pid.to_string());
        write!(
            f,
            "{} [{}] - {} {}{}",
            self.command,
            pid_str,
            state_str,
            self.args.join(" "),
            self.exit_code
                .map_or(String::new(), |code| format!(" (exit: {})", code))
        )
    }
}
