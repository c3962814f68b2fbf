use std::time::Duration;

/// Separator between a message tag and its payload on the wire.
pub const MSG_DELIMITER: &str = "##";

/// How long a connect attempt may take before it is abandoned.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the listener waits for any server line before treating the
/// connection as dead.
pub const IDLE_READ_TIMEOUT: Duration = Duration::from_millis(1_500_000);

/// Longest server line, terminator excluded, the listener accepts.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Lowest port a CONNECT command may target.
pub const MIN_PORT: i32 = 1024;
/// Highest port a CONNECT command may target.
pub const MAX_PORT: i32 = 65535;

/// Timeouts and limits for a [`ServerConnection`](crate::ServerConnection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_line_len: usize,
}

impl ClientConfig {
    pub fn new(connect_timeout: Duration, idle_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            idle_timeout,
            max_line_len: MAX_LINE_LEN,
        }
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(CONNECT_TIMEOUT, IDLE_READ_TIMEOUT)
    }
}
