//! Wire codec for the newline-delimited text protocol.
//!
//! Every message is one line: either free text, or `TAG##payload`.

use std::fmt;

use crate::command::Command;
pub use crate::config::MSG_DELIMITER;
use crate::error::DecodeError;

/// Message tags the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgType {
    Start,
    Finish,
    Guess,
    Disconnect,
    Result,
}

impl MsgType {
    pub fn as_str(self) -> &'static str {
        match self {
            MsgType::Start => "START",
            MsgType::Finish => "FINISH",
            MsgType::Guess => "GUESS",
            MsgType::Disconnect => "DISCONNECT",
            MsgType::Result => "RESULT",
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire form of `cmd`, or `None` for commands that only act on the
/// connection itself (CONNECT, DISCONNECT).
pub fn encode(cmd: &Command) -> Option<String> {
    match cmd {
        Command::Start => Some(MsgType::Start.to_string()),
        Command::Finish => Some(MsgType::Finish.to_string()),
        Command::Guess { token } => Some(format!("{}{}{}", MsgType::Guess, MSG_DELIMITER, token)),
        Command::Connect { .. } | Command::Disconnect => None,
    }
}

/// Turn a server line into display text.
///
/// Lines without a delimiter pass through unchanged. `RESULT` payloads must
/// hold exactly three whitespace-separated fields.
pub fn decode(line: &str) -> Result<String, DecodeError> {
    let mut parts: Vec<&str> = line.split(MSG_DELIMITER).collect();
    while parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    if parts.len() == 1 {
        return Ok(line.to_string());
    }

    let (tag, payload) = (parts[0], parts[1]);
    if tag != MsgType::Result.as_str() {
        return Ok(format!("{tag}: {payload}"));
    }

    let fields: Vec<&str> = payload.split_whitespace().collect();
    match fields.as_slice() {
        [remaining, value, score] => Ok(format!(
            "{tag}: {remaining} attempts remaining: {value} score: {score}"
        )),
        _ => Err(DecodeError::ResultFieldCount {
            found: fields.len(),
            payload: payload.to_string(),
        }),
    }
}

/// Like [`decode`], but falls back to the raw line when it cannot be decoded.
pub fn render(line: &str) -> String {
    decode(line).unwrap_or_else(|e| {
        log::warn!("undecodable server line {line:?}: {e}");
        line.to_string()
    })
}
