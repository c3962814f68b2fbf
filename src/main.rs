use std::sync::Arc;

use clap::Parser;
use tokio::time::Duration;

use guess_client::{
    controller, init_logging, ClientConfig, Controller, OutputSink, StdinSource, StdoutSink,
    CONNECT_TIMEOUT, IDLE_READ_TIMEOUT, MAX_LINE_LEN,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Console client for the guessing game server",
    long_about = None
)]
struct Cli {
    /// Server IPv4 address to connect to at startup.
    #[arg(long, requires = "port")]
    host: Option<String>,
    /// Server port to connect to at startup.
    #[arg(long, requires = "host")]
    port: Option<String>,
    /// Seconds to wait for a connection.
    #[arg(long, default_value_t = CONNECT_TIMEOUT.as_secs())]
    connect_timeout_secs: u64,
    /// Milliseconds without server traffic before the connection is dropped.
    #[arg(long, default_value_t = IDLE_READ_TIMEOUT.as_millis() as u64)]
    idle_timeout_ms: u64,
    /// Longest server line accepted before the connection is dropped.
    #[arg(long, default_value_t = MAX_LINE_LEN)]
    max_line_len: usize,
    /// Log level (error, warn, info, debug, trace); overrides GUESS_CLIENT_LOG.
    #[arg(long)]
    log_level: Option<log::LevelFilter>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = ClientConfig::new(
        Duration::from_secs(cli.connect_timeout_secs),
        Duration::from_millis(cli.idle_timeout_ms),
    )
    .with_max_line_len(cli.max_line_len);
    let sink: Arc<dyn OutputSink> = Arc::new(StdoutSink::new());
    for line in controller::usage() {
        sink.print_result(&line);
    }

    let mut controller = Controller::with_config(sink, config);
    if let (Some(host), Some(port)) = (cli.host, cli.port) {
        // Goes through the same checks as a typed CONNECT.
        controller.handle_command(&format!("CONNECT {host} {port}")).await;
    }

    let mut input = StdinSource::new();
    controller.run(&mut input).await
}
