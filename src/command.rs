//! Console command grammar.
//!
//! A command line is split on whitespace; the first token is the tag and must
//! match one of [`CommandTag`] exactly (case-sensitive). Validation is a pure
//! decision over the line and a snapshot of the connection state.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{MAX_PORT, MIN_PORT, MSG_DELIMITER};
use crate::connection::ConnectionState;
use crate::error::CommandError;

// Only the digit count per octet is checked; 999.1.1.1 passes.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$")
        .expect("IPv4 pattern is a valid regex")
});

/// Tags accepted on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTag {
    Connect,
    Start,
    Finish,
    Disconnect,
    Guess,
}

impl CommandTag {
    pub const ALL: [CommandTag; 5] = [
        CommandTag::Connect,
        CommandTag::Start,
        CommandTag::Finish,
        CommandTag::Disconnect,
        CommandTag::Guess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandTag::Connect => "CONNECT",
            CommandTag::Start => "START",
            CommandTag::Finish => "FINISH",
            CommandTag::Disconnect => "DISCONNECT",
            CommandTag::Guess => "GUESS",
        }
    }

    /// Number of tokens following the tag.
    pub fn arity(self) -> usize {
        match self {
            CommandTag::Connect => 2,
            CommandTag::Guess => 1,
            CommandTag::Start | CommandTag::Finish | CommandTag::Disconnect => 0,
        }
    }

    /// One-line usage string, e.g. `CONNECT <ipv4> <port>`.
    pub fn usage(self) -> &'static str {
        match self {
            CommandTag::Connect => "CONNECT <ipv4> <port>",
            CommandTag::Start => "START",
            CommandTag::Finish => "FINISH",
            CommandTag::Disconnect => "DISCONNECT",
            CommandTag::Guess => "GUESS <token>",
        }
    }
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandTag {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| CommandError::Unknown(s.to_string()))
    }
}

/// A validated console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect { host: String, port: u16 },
    Start,
    Finish,
    Disconnect,
    Guess { token: String },
}

impl Command {
    pub fn tag(&self) -> CommandTag {
        match self {
            Command::Connect { .. } => CommandTag::Connect,
            Command::Start => CommandTag::Start,
            Command::Finish => CommandTag::Finish,
            Command::Disconnect => CommandTag::Disconnect,
            Command::Guess { .. } => CommandTag::Guess,
        }
    }
}

/// Check `line` against the command grammar given the current connection
/// state. Never performs I/O.
///
/// Checks run in a fixed order: tag, connection-state precondition, arity
/// (too few before too many), then argument syntax.
pub fn validate(line: &str, state: ConnectionState) -> Result<Command, CommandError> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next().unwrap_or("");
    let args: Vec<&str> = tokens.collect();
    let tag: CommandTag = head.parse()?;

    match (tag, state) {
        (CommandTag::Connect, ConnectionState::Connected) => {
            return Err(CommandError::AlreadyConnected);
        }
        (CommandTag::Disconnect, ConnectionState::Disconnected) => {
            return Err(CommandError::NothingToDisconnect(head.to_string()));
        }
        (
            CommandTag::Start | CommandTag::Finish | CommandTag::Guess,
            ConnectionState::Disconnected,
        ) => {
            return Err(CommandError::NotConnected(head.to_string()));
        }
        _ => {}
    }

    if args.len() < tag.arity() {
        return Err(CommandError::NotEnoughArguments(head.to_string()));
    }
    if args.len() > tag.arity() {
        return Err(CommandError::TooManyArguments(head.to_string()));
    }

    match tag {
        CommandTag::Connect => {
            if !validate_ip(args[0]) {
                return Err(CommandError::InvalidAddress(head.to_string()));
            }
            let port = parse_port(args[1])
                .ok_or_else(|| CommandError::InvalidPort(head.to_string()))?;
            Ok(Command::Connect {
                host: args[0].to_string(),
                port,
            })
        }
        CommandTag::Start => Ok(Command::Start),
        CommandTag::Finish => Ok(Command::Finish),
        CommandTag::Disconnect => Ok(Command::Disconnect),
        CommandTag::Guess => {
            let token = args[0];
            if token.contains(MSG_DELIMITER) {
                return Err(CommandError::ReservedDelimiter(token.to_string()));
            }
            Ok(Command::Guess {
                token: token.to_string(),
            })
        }
    }
}

/// Dotted-quad shape check: four groups of one to three ASCII digits.
pub fn validate_ip(input: &str) -> bool {
    IPV4_PATTERN.is_match(input)
}

/// True when `input` parses as an integer in `[1024, 65535]`.
pub fn validate_port(input: &str) -> bool {
    parse_port(input).is_some()
}

fn parse_port(input: &str) -> Option<u16> {
    let port: i32 = input.parse().ok()?;
    if !(MIN_PORT..=MAX_PORT).contains(&port) {
        return None;
    }
    u16::try_from(port).ok()
}
