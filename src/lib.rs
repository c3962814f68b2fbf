//! Console client for the line-based guessing game protocol.
//!
//! Commands typed by the user are checked by [`command::validate`], encoded
//! by [`protocol::encode`] and written by [`ServerConnection`]. A listener task
//! per connection decodes server lines with [`protocol::render`] and hands
//! them to an [`OutputSink`].

pub mod command;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod input;
pub mod listener;
mod logging;
pub mod output;
pub mod protocol;

pub use command::{validate, validate_ip, validate_port, Command, CommandTag};
pub use config::*;
pub use connection::{ConnectionState, ServerConnection};
pub use controller::{Controller, Outcome};
pub use error::{ClientError, CommandError, DecodeError};
pub use input::{LineSource, ScriptSource, StdinSource};
pub use listener::{ListenerExit, ListenerHandle};
pub use logging::{init_logging, LOG_ENV_VAR};
pub use output::{BufferSink, OutputSink, StdoutSink};
pub use protocol::{decode, encode, render, MsgType};
