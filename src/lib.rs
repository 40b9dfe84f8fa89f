//! MediaBridge - an interactive session bridge for media catalog scripts
//!
//! This library wraps a terminal-interactive media catalog and download
//! CLI so a GUI can drive it. It spawns the script as a child process,
//! incrementally decodes its stdout/stderr, recognizes the selection
//! protocol the script speaks (season/episode counts, box-drawing tables
//! and input prompts), and forwards validated user selections back on
//! stdin.
//!
//! ## Module Organization
//!
//! - [`process`] - Child process spawning, stdio plumbing, lifecycle
//! - [`decoder`] - Incremental stream decoding: markers, prompts, tables
//! - [`session`] - Selection state machine and the orchestrating bridge
//! - [`input`] - Selection parsing, validation and stdin forwarding
//! - [`config`] - Configuration loading and launch settings
//! - [`models`] - Data structures (ChildProcess, TableFrame)
//! - [`mod@error`] - Error types and the crate Result alias
//!
//! ## Quick Start
//!
//! ```no_run
//! use mediabridge::{LaunchConfig, Session, SessionUpdate};
//!
//! # async fn demo() -> mediabridge::Result<()> {
//! let config = LaunchConfig::default();
//! let mut session = Session::launch(&config).await?;
//!
//! while let Some(update) = session.next_update().await {
//!     match update {
//!         SessionUpdate::PromptReady { .. } => session.submit("1").map(|_| ())?,
//!         SessionUpdate::ProcessExited { .. } => break,
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Each session runs four background tasks: one reader per output
//! stream, one stdin writer, and a monitor that owns the child handle
//! and publishes its exit exactly once. The bridge loop consumes their
//! channels, feeds one decoder shared by both streams, and emits an
//! ordered stream of [`SessionUpdate`]s toward the caller.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod decoder;
pub mod error;
pub mod input;
pub mod models;
pub mod process;
pub mod session;

// Re-exports for core functionality
pub use config::{Config, LaunchConfig, SessionConfig, Site};
pub use decoder::{DecodeEvent, StreamDecoder};
pub use error::{Error, Result};
pub use input::{InputForwarder, Selection};
pub use process::{ProcessController, SessionHandle};
pub use session::{Session, SessionContext, SessionStateMachine, SessionUpdate};

// Convenience re-exports for common types
pub use config::loader::ConfigLoader;
pub use models::{ChildProcess, TableFrame};

/// The current version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install a tracing subscriber honoring `RUST_LOG`, defaulting to `info`.
/// Call once from the embedding application; a second call is a no-op.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Load configuration, falling back to defaults when nothing is on disk
/// or the file is unreadable
pub fn init() -> Config {
    info!("initializing {} v{}", NAME, VERSION);

    match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("failed to load configuration: {}, using defaults", e);
            Config::default()
        }
    }
}
