//! Background reader for one server connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use crate::output::OutputSink;
use crate::protocol;

/// Message printed once when a listener stops.
pub const TERMINATED_MSG: &str = "Connection terminated.";

/// Why a listener stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerExit {
    /// The server closed its side of the stream.
    Eof,
    /// No line arrived within the idle timeout.
    IdleTimeout,
    /// The server sent more than the line limit without a newline.
    LineTooLong(usize),
    /// Reading from the socket failed.
    ReadError(String),
    /// The owning connection asked the listener to stop.
    Cancelled,
}

/// Owner's side of a running listener task.
pub struct ListenerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<ListenerExit>,
}

impl ListenerHandle {
    /// Spawn the read loop on the current runtime. `alive` is cleared when the
    /// loop exits, whatever the reason.
    pub fn spawn<R>(
        reader: R,
        sink: Arc<dyn OutputSink>,
        alive: Arc<AtomicBool>,
        idle_timeout: Duration,
        max_line_len: usize,
    ) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let limits = Limits {
            idle_timeout,
            max_line_len,
        };
        let task = tokio::spawn(run(reader, sink, alive, limits, rx));
        Self {
            shutdown: Some(tx),
            task,
        }
    }

    /// Ask the read loop to stop and wait for it.
    pub async fn stop(mut self) -> Option<ListenerExit> {
        if let Some(tx) = self.shutdown.take() {
            // The loop may already be gone.
            let _ = tx.send(());
        }
        self.join().await
    }

    /// Wait for the read loop to finish on its own.
    pub async fn join(self) -> Option<ListenerExit> {
        match self.task.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                log::error!("listener task failed: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    idle_timeout: Duration,
    max_line_len: usize,
}

async fn run<R>(
    mut reader: R,
    sink: Arc<dyn OutputSink>,
    alive: Arc<AtomicBool>,
    limits: Limits,
    mut shutdown: oneshot::Receiver<()>,
) -> ListenerExit
where
    R: AsyncBufRead + Unpin,
{
    // Room for the limit plus a CRLF terminator.
    let cap = limits.max_line_len as u64 + 2;
    let mut buf = Vec::new();
    let exit = loop {
        buf.clear();
        let mut limited = (&mut reader).take(cap);
        let read_line = limited.read_until(b'\n', &mut buf);
        tokio::select! {
            _ = &mut shutdown => break ListenerExit::Cancelled,
            read = timeout(limits.idle_timeout, read_line) => {
                match read {
                    Err(_) => break ListenerExit::IdleTimeout,
                    Ok(Err(e)) => break ListenerExit::ReadError(e.to_string()),
                    Ok(Ok(0)) => break ListenerExit::Eof,
                    Ok(Ok(n)) => {
                        let unterminated = n as u64 == cap && !buf.ends_with(b"\n");
                        let line = trim_line_end(&buf);
                        if unterminated || line.len() > limits.max_line_len {
                            break ListenerExit::LineTooLong(limits.max_line_len);
                        }
                        let line = String::from_utf8_lossy(line);
                        log::trace!("<- {line}");
                        sink.print_result(&protocol::render(&line));
                    }
                }
            }
        }
    };

    alive.store(false, Ordering::SeqCst);
    log::info!("listener stopped: {exit:?}");
    sink.print_result(TERMINATED_MSG);
    exit
}

fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
