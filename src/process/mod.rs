//! Child Process Management
//!
//! Spawning, stdio plumbing and lifecycle control for the catalog script
//! child process.

pub mod controller;
pub mod signals;

pub use controller::{ProcessController, SessionHandle};
pub use signals::Signal;
