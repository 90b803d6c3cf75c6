use anyhow::Result;
use clap::Parser;
use rustle_apt::cli::{run, RustleAptCli};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = RustleAptCli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Starting rustle-apt v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(2);
        }
    }
}
