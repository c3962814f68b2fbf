//! Connection lifecycle: connect, send, disconnect.
//!
//! The socket is split on connect. The write half stays here and is only used
//! by the command path; the read half moves into the listener task. The only
//! state the two share is the per-connection `alive` flag.

use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::listener::{ListenerExit, ListenerHandle};
use crate::output::OutputSink;
use crate::protocol::MsgType;

pub const CONNECTED_MSG: &str = "Successfully connected to the game server.";
pub const CONNECT_FAILED_MSG: &str = "Unable to connect to the server.";
pub const CLOSE_FAILED_MSG: &str = "Unable to close the socket.";

type Writer = Pin<Box<dyn AsyncWrite + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("disconnected"),
            ConnectionState::Connected => f.write_str("connected"),
        }
    }
}

/// One live connection: the write half plus the listener reading the other
/// half.
struct Link {
    peer: String,
    writer: Writer,
    alive: Arc<AtomicBool>,
    listener: ListenerHandle,
}

/// Client side of the game connection.
pub struct ServerConnection {
    config: ClientConfig,
    sink: Arc<dyn OutputSink>,
    link: Option<Link>,
}

impl ServerConnection {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self::with_config(sink, ClientConfig::default())
    }

    pub fn with_config(sink: Arc<dyn OutputSink>, config: ClientConfig) -> Self {
        Self {
            config,
            sink,
            link: None,
        }
    }

    /// Current state. Goes to `Disconnected` on its own once the listener
    /// sees the stream end.
    pub fn state(&self) -> ConnectionState {
        match &self.link {
            Some(link) if link.alive.load(Ordering::SeqCst) => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Address of the server, while connected.
    pub fn peer(&self) -> Option<&str> {
        self.link
            .as_ref()
            .filter(|l| l.alive.load(Ordering::SeqCst))
            .map(|l| l.peer.as_str())
    }

    /// Open a connection and start its listener.
    ///
    /// On failure the state stays `Disconnected` and no listener is started.
    pub async fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        if self.is_connected() {
            return Err(ClientError::AlreadyConnected);
        }
        self.reap().await;

        let addr = format!("{host}:{port}");
        log::info!("connecting to {addr}");
        let attempt = timeout(self.config.connect_timeout, TcpStream::connect(addr.as_str()));
        let stream = match attempt.await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                log::warn!("connect to {addr} failed: {source}");
                self.sink.print_result(CONNECT_FAILED_MSG);
                return Err(ClientError::Connect { addr, source });
            }
            Err(_) => {
                log::warn!("connect to {addr} timed out");
                self.sink.print_result(CONNECT_FAILED_MSG);
                return Err(ClientError::ConnectTimeout {
                    addr,
                    after: self.config.connect_timeout,
                });
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("set_nodelay failed: {e}");
        }

        let (read_half, write_half) = stream.into_split();
        self.attach(addr, BufReader::new(read_half), write_half);
        Ok(())
    }

    /// Take over an established stream pair: report success and start the
    /// listener on `reader`.
    pub(crate) fn attach<R, W>(&mut self, peer: String, reader: R, writer: W)
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Send + 'static,
    {
        let alive = Arc::new(AtomicBool::new(true));
        self.sink.print_result(CONNECTED_MSG);
        let listener = ListenerHandle::spawn(
            reader,
            self.sink.clone(),
            alive.clone(),
            self.config.idle_timeout,
            self.config.max_line_len,
        );
        log::info!("connected to {peer}");
        self.link = Some(Link {
            peer,
            writer: Box::pin(writer),
            alive,
            listener,
        });
    }

    /// Write `payload` as one line.
    pub async fn send_message(&mut self, payload: &str) -> Result<(), ClientError> {
        let link = match self.link.as_mut() {
            Some(link) if link.alive.load(Ordering::SeqCst) => link,
            _ => return Err(ClientError::NotConnected),
        };
        log::debug!("-> {payload}");
        write_line(&mut link.writer, payload)
            .await
            .map_err(ClientError::Write)
    }

    /// Tell the server we are leaving, close the socket and stop the
    /// listener.
    ///
    /// The state is `Disconnected` afterwards even when closing failed; the
    /// failure is still reported to the sink and returned.
    pub async fn disconnect(&mut self) -> Result<(), ClientError> {
        if !self.is_connected() {
            self.reap().await;
            return Err(ClientError::NotConnected);
        }
        let Some(mut link) = self.link.take() else {
            return Err(ClientError::NotConnected);
        };
        link.alive.store(false, Ordering::SeqCst);

        let closed = async {
            write_line(&mut link.writer, MsgType::Disconnect.as_str()).await?;
            link.writer.shutdown().await
        }
        .await;

        let exit = link.listener.stop().await;
        log::info!("disconnected from {} ({exit:?})", link.peer);

        closed.map_err(|e| {
            log::warn!("closing connection to {} failed: {e}", link.peer);
            self.sink.print_result(CLOSE_FAILED_MSG);
            ClientError::Close(e)
        })
    }

    /// Drop a link whose listener has already ended.
    async fn reap(&mut self) {
        if let Some(link) = self.link.take() {
            let exit: Option<ListenerExit> = link.listener.stop().await;
            log::debug!("reaped connection to {} ({exit:?})", link.peer);
        }
    }
}

async fn write_line(writer: &mut Writer, payload: &str) -> std::io::Result<()> {
    let mut line = String::with_capacity(payload.len() + 1);
    line.push_str(payload);
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
