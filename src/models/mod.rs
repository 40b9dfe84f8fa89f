//! Core data models for mediabridge
//!
//! This module contains the data structures that represent the domain
//! entities of the session bridge: the child process bookkeeping record
//! and the parsed table frames extracted from its output.

pub mod process;
pub mod table_frame;

// Re-exports for convenience
pub use process::{ChildProcess, ProcessState};
pub use table_frame::TableFrame;
