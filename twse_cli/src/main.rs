mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use twse_lib::Config;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "twse")]
#[command(about = "Daily Taiwan Stock Exchange board from the exchange's open-data feeds")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Snapshot directory (overrides TWSE_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// API base URL (overrides TWSE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Fetch timeout in seconds for each request and each feed (overrides
    /// TWSE_REQUEST_TIMEOUT_SECS and TWSE_FEED_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download all three feeds into the snapshot directory
    Sync,
    /// Show the merged board, optionally sorted
    List(commands::list::ListArgs),
    /// Show the stored snapshots
    Status,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        match self.timeout_secs.filter(|s| *s > 0) {
            Some(secs) => config.with_fetch_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("twse=info".parse::<tracing_subscriber::filter::Directive>()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;
    let config = cli.config();

    match &cli.command {
        Commands::Sync => commands::sync::run(&config, &format).await?,
        Commands::List(args) => commands::list::run(args, &config, &format).await?,
        Commands::Status => commands::status::run(&config, &format).await?,
    }

    Ok(())
}
