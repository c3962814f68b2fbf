use std::collections::VecDeque;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Source of raw console lines, pulled one at a time.
#[async_trait::async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> anyhow::Result<Option<String>>;
}

/// Reads lines from the process's standard input.
pub struct StdinSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LineSource for StdinSource {
    async fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Replays a fixed list of lines.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    lines: VecDeque<String>,
}

impl ScriptSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait::async_trait]
impl LineSource for ScriptSource {
    async fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
