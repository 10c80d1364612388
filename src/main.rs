use clap::Parser;
use std::path::PathBuf;
use toolserver::app::AppConfig;
use toolserver::services::logger::LogLevel;

/// MCP stdio server that invokes OpenAPI operations on configured tool servers.
#[derive(Debug, Parser)]
#[command(name = "toolserver", version)]
struct Cli {
    /// Connections file (overrides TOOLSERVER_CONNECTIONS).
    #[arg(long)]
    connections: Option<PathBuf>,
    /// error, warn, info or debug (overrides LOG_LEVEL).
    #[arg(long)]
    log_level: Option<LogLevel>,
    /// Per-request timeout in milliseconds (overrides TOOLSERVER_TIMEOUT_MS).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("toolserver: {}", err);
            std::process::exit(2);
        }
    };
    if let Some(path) = cli.connections {
        config.connections_path = path;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.timeout_ms.is_some() {
        config.timeout_ms = cli.timeout_ms;
    }

    if let Err(err) = toolserver::mcp::server::run_stdio(config).await {
        eprintln!("toolserver: {}", err);
        std::process::exit(1);
    }
}
