use std::env;
use log::{self, LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Environment variable holding the log level.
pub const LOG_ENV_VAR: &str = "GUESS_CLIENT_LOG";

/// Initialize logging. An explicit `level` wins; otherwise the level is taken
/// from the `GUESS_CLIENT_LOG` environment variable, defaulting to `info` if
/// the variable is not set or invalid.
///
/// Records go to stderr; stdout carries only game output.
pub fn init_logging(level: Option<LevelFilter>) {
    let level = level.unwrap_or_else(|| {
        env::var(LOG_ENV_VAR)
            .ok()
            .and_then(|lvl| lvl.parse().ok())
            .unwrap_or(LevelFilter::Info)
    });
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
