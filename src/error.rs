/// Reasons a console command line is rejected before anything touches the
/// network. The `Display` text is exactly what the user is shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("This command is unknown: {0}")]
    Unknown(String),

    #[error("You are already connected to a game server, Disconnect first.")]
    AlreadyConnected,

    /// START, FINISH or GUESS issued without a connection.
    #[error("First you should connect to the server: {0}")]
    NotConnected(String),

    /// DISCONNECT issued without a connection.
    #[error("You are not connected to any server: {0}")]
    NothingToDisconnect(String),

    #[error("Not enough arguments in: {0}")]
    NotEnoughArguments(String),

    #[error("Too much arguments in: {0}")]
    TooManyArguments(String),

    #[error("IPv4 format is not correct in: {0}")]
    InvalidAddress(String),

    #[error("PORT is not correct in: {0}")]
    InvalidPort(String),

    #[error("GUESS token must not contain {delim:?}: {0}", delim = crate::config::MSG_DELIMITER)]
    ReservedDelimiter(String),
}

impl CommandError {
    /// True for diagnostics caused by the connection-state precondition
    /// rather than by the shape of the input.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            CommandError::AlreadyConnected
                | CommandError::NotConnected(_)
                | CommandError::NothingToDisconnect(_)
        )
    }
}

/// An inbound line that carries a known tag but a payload of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("RESULT payload needs 3 fields, got {found}: {payload:?}")]
    ResultFieldCount { found: usize, payload: String },
}

/// Failures of the connection layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not connected to a game server")]
    NotConnected,

    #[error("already connected to a game server")]
    AlreadyConnected,

    #[error("connect to {addr} timed out after {after:?}")]
    ConnectTimeout {
        addr: String,
        after: std::time::Duration,
    },

    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("socket close failed: {0}")]
    Close(#[source] std::io::Error),
}
