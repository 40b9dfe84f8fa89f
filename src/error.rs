//! Error types and Result aliases for mediabridge

use std::fmt;
use std::path::PathBuf;

/// Result type alias for mediabridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mediabridge
#[derive(Debug)]
pub enum Error {
    // === Process-related errors ===
    /// The child executable could not be located
    CommandNotFound {
        command: String,
    },

    /// Failed to spawn the child process
    SpawnFailed {
        command: String,
        reason: String,
    },

    /// A stdio handle could not be taken from the spawned child
    StdioUnavailable {
        stream: String,
    },

    /// Write attempted while the child process is not running
    ProcessNotRunning,

    /// Failed to queue input for the child's stdin
    WriteFailed {
        reason: String,
    },

    /// Failed to send a signal to the child process
    SignalSendFailed {
        signal: String,
        reason: String,
    },

    // === Decoder errors ===
    /// A table frame or marker could not be decoded; the session continues
    DecodeAnomaly {
        reason: String,
    },

    // === Input errors ===
    /// User input did not match any accepted selection form
    InvalidSelection {
        input: String,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to save configuration file
    ConfigSaveFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration file not found
    ConfigNotFound,

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    /// Regex compilation errors
    Regex(regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Process errors
            Error::CommandNotFound { command } => {
                write!(f, "Command '{}' not found in PATH", command)
            }
            Error::SpawnFailed { command, reason } => {
                write!(f, "Failed to spawn '{}': {}", command, reason)
            }
            Error::StdioUnavailable { stream } => {
                write!(f, "Child process {} handle unavailable", stream)
            }
            Error::ProcessNotRunning => {
                write!(f, "Child process is not running")
            }
            Error::WriteFailed { reason } => {
                write!(f, "Failed to write to child stdin: {}", reason)
            }
            Error::SignalSendFailed { signal, reason } => {
                write!(f, "Failed to send signal '{}': {}", signal, reason)
            }

            // Decoder errors
            Error::DecodeAnomaly { reason } => {
                write!(f, "Decode anomaly: {}", reason)
            }

            // Input errors
            Error::InvalidSelection { input } => {
                write!(f, "Invalid selection '{}': expected an index, '*' or a range like '1-3' / '2-*'", input)
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigSaveFailed { path, reason } => {
                write!(f, "Failed to save config to '{}': {}", path.display(), reason)
            }
            Error::ConfigNotFound => {
                write!(f, "Configuration file not found")
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
            Error::Regex(err) => write!(f, "Regex compilation error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Regex(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
