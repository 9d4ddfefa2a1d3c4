//! Chat-facing surface of the engine.
//!
//! # Data Flow
//! ```text
//! stdin / async reader
//!     → input.rs (lines forwarded over a channel)
//!     → session.rs (one message per line, current engine per message)
//!     → reply.rs (detect, substitute, apply presentation policy)
//!     → outbound plain-text reply, or nothing
//! ```

pub mod input;
pub mod reply;
pub mod session;

pub use input::{spawn_blocking_lines, spawn_line_reader, Messages};
pub use reply::compose_reply;
pub use session::{Session, SessionStats};
