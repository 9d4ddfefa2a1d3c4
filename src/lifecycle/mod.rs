//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Load registry → Build engine → Start watcher / metrics
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Sessions stop reading → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Reload the registry
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registry, then message loop
//! - Reload never stops message handling; sessions pick up the new engine
//!   on their next message

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
