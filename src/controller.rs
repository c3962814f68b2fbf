//! Command dispatch: validate a console line, then act on the connection.

use std::sync::Arc;

use crate::command::{self, Command, CommandTag};
use crate::config::ClientConfig;
use crate::connection::{ConnectionState, ServerConnection};
use crate::input::LineSource;
use crate::output::OutputSink;
use crate::protocol;

pub const SEND_FAILED_MSG: &str = "Unable to send message to the server.";

/// Console word that ends the session.
pub const QUIT: &str = "QUIT";

/// What happened to one console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line was rejected; a diagnostic was printed.
    Rejected,
    /// The command ran to completion.
    Done,
    /// The command was valid but the network step failed.
    Failed,
}

pub struct Controller {
    sink: Arc<dyn OutputSink>,
    conn: ServerConnection,
}

impl Controller {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self::with_config(sink, ClientConfig::default())
    }

    pub fn with_config(sink: Arc<dyn OutputSink>, config: ClientConfig) -> Self {
        let conn = ServerConnection::with_config(sink.clone(), config);
        Self { sink, conn }
    }

    pub fn state(&self) -> ConnectionState {
        self.conn.state()
    }

    /// Handle one console line. Every error is reported to the sink; none of
    /// them ends the session.
    pub async fn handle_command(&mut self, line: &str) -> Outcome {
        let cmd = match command::validate(line, self.conn.state()) {
            Ok(cmd) => cmd,
            Err(e) => {
                log::debug!("rejected {line:?}: {e}");
                self.sink.print_result(&e.to_string());
                return Outcome::Rejected;
            }
        };

        let result = match &cmd {
            Command::Connect { host, port } => self.conn.connect(host, *port).await,
            Command::Disconnect => self.conn.disconnect().await,
            other => match protocol::encode(other) {
                Some(msg) => self.conn.send_message(&msg).await.inspect_err(|_| {
                    self.sink.print_result(SEND_FAILED_MSG);
                }),
                None => Ok(()),
            },
        };

        match result {
            Ok(()) => Outcome::Done,
            Err(e) => {
                log::warn!("{} failed: {e}", cmd.tag());
                Outcome::Failed
            }
        }
    }

    /// Feed lines from `source` until it runs dry or the user types `QUIT`,
    /// then drop any open connection.
    pub async fn run<S: LineSource + ?Sized>(&mut self, source: &mut S) -> anyhow::Result<()> {
        while let Some(line) = source.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == QUIT {
                break;
            }
            self.handle_command(line).await;
        }
        self.shutdown().await;
        Ok(())
    }

    /// Disconnect if still connected.
    pub async fn shutdown(&mut self) {
        if self.conn.is_connected() {
            // Failures are already reported to the sink.
            let _ = self.conn.disconnect().await;
        }
    }
}

/// Lines printed at startup describing the console commands.
pub fn usage() -> Vec<String> {
    let mut lines = vec!["Commands:".to_string()];
    lines.extend(CommandTag::ALL.iter().map(|t| format!("  {}", t.usage())));
    lines.push(format!("  {QUIT}"));
    lines
}
