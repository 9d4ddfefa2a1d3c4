//! Inbound message sources.
//!
//! # Responsibilities
//! - Turn a byte stream into a channel of message lines for `Session`
//!
//! # Design Decisions
//! - Undecodable lines are forwarded as `InvalidData` errors and reading goes on
//! - Any other read error is forwarded once, then the source ends
//! - Blocking sources (process stdin) get a dedicated OS thread instead of the
//!   Tokio blocking pool, so runtime shutdown never waits on a pending read

use std::io::{self, BufRead};
use std::thread;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// A stream of inbound message lines.
pub type Messages = mpsc::Receiver<io::Result<String>>;

const CHANNEL_CAPACITY: usize = 64;

/// Forward lines from an async reader on a Tokio task.
pub fn spawn_line_reader<R>(reader: R) -> Messages
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => Ok(line),
                Ok(None) => break,
                Err(e) => Err(e),
            };
            let fatal = matches!(&line, Err(e) if e.kind() != io::ErrorKind::InvalidData);
            if tx.send(line).await.is_err() || fatal {
                break;
            }
        }
    });
    rx
}

/// Forward lines from a blocking reader on a detached OS thread.
///
/// The thread ends at end of input, on a read error, or once the receiver is
/// dropped and the next line arrives. A read still pending at process exit is
/// abandoned.
pub fn spawn_blocking_lines<R>(reader: R) -> io::Result<Messages>
where
    R: io::Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::BufReader::new(reader).lines() {
                let fatal = matches!(&line, Err(e) if e.kind() != io::ErrorKind::InvalidData);
                if tx.blocking_send(line).is_err() || fatal {
                    break;
                }
            }
            tracing::debug!("Input reader finished");
        })?;
    Ok(rx)
}
