//! Line-oriented message loop.
//!
//! # Responsibilities
//! - Receive one inbound message body per line from an input source
//! - Compose a reply against the engine current at that moment
//! - Write each reply followed by a newline
//!
//! # Design Decisions
//! - Undecodable input lines are logged and skipped
//! - Write failures are logged and the message is dropped
//! - Stops on end of input or shutdown, whichever comes first; reading
//!   happens in the input source, so a pending read never delays shutdown

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::bot::input::Messages;
use crate::bot::reply::compose_reply;
use crate::config::ReplyConfig;
use crate::engine::EngineHandle;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::logging::oneline;

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub messages: u64,
    pub replies: u64,
    pub errors: u64,
}

/// A message loop over an input source and a writer.
pub struct Session<W> {
    messages: Messages,
    writer: W,
    handle: Arc<EngineHandle>,
    reply: ReplyConfig,
}

impl<W> Session<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(messages: Messages, writer: W, handle: Arc<EngineHandle>, reply: ReplyConfig) -> Self {
        Self {
            messages,
            writer,
            handle,
            reply,
        }
    }

    /// Run until end of input or shutdown.
    pub async fn run(self, mut shutdown: ShutdownSignal) -> SessionStats {
        let Self {
            mut messages,
            mut writer,
            handle,
            reply,
        } = self;
        let mut stats = SessionStats::default();

        loop {
            let line = tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Session stopping on shutdown");
                    break;
                }
                line = messages.recv() => line,
            };

            let body = match line {
                Some(Ok(body)) => body,
                None => {
                    tracing::info!("End of input");
                    break;
                }
                Some(Err(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                    tracing::warn!(error = %e, "Skipping undecodable message");
                    stats.errors += 1;
                    continue;
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Input failed, stopping session");
                    stats.errors += 1;
                    break;
                }
            };

            stats.messages += 1;
            tracing::debug!(body = %oneline(&body), "Message received");

            let engine = handle.load();
            let Some(text) = compose_reply(&engine, &body, &reply) else {
                continue;
            };

            let sent = async {
                writer.write_all(text.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await
            }
            .await;

            match sent {
                Ok(()) => {
                    stats.replies += 1;
                    tracing::debug!(reply = %oneline(&text), "Reply sent");
                }
                Err(e) => {
                    stats.errors += 1;
                    tracing::warn!(error = %e, "Failed to send reply");
                }
            }
        }

        tracing::info!(
            messages = stats.messages,
            replies = stats.replies,
            errors = stats.errors,
            "Session finished"
        );
        stats
    }
}
