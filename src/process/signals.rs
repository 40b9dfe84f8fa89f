//! Process Signal Handling
//!
//! Sends control signals to the child process. Graceful stop sends
//! Terminate first and falls back to Kill when the grace period expires.

use crate::error::{Error, Result};

/// Signal types that can be sent to the child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Interrupt signal (Ctrl+C)
    Interrupt,
    /// Termination signal (graceful shutdown)
    Terminate,
    /// Kill signal (forceful termination)
    Kill,
}

impl Signal {
    /// Human-readable signal name for logging and errors
    pub const fn as_str(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Kill => "SIGKILL",
        }
    }
}

/// Send a signal to a process by PID
#[cfg(unix)]
pub fn send(pid: u32, signal: Signal) -> Result<()> {
    use nix::sys::signal as nix_signal;
    use nix::unistd::Pid;

    let sig = match signal {
        Signal::Interrupt => nix_signal::Signal::SIGINT,
        Signal::Terminate => nix_signal::Signal::SIGTERM,
        Signal::Kill => nix_signal::Signal::SIGKILL,
    };

    nix_signal::kill(Pid::from_raw(pid as i32), sig).map_err(|e| Error::SignalSendFailed {
        signal: signal.as_str().to_string(),
        reason: e.to_string(),
    })
}

/// Signal delivery is unix-only; other platforms rely on the controller's
/// unconditional kill fallback
#[cfg(not(unix))]
pub fn send(_pid: u32, signal: Signal) -> Result<()> {
    Err(Error::SignalSendFailed {
        signal: signal.as_str().to_string(),
        reason: format!("not supported on {}", std::env::consts::OS),
    })
}
