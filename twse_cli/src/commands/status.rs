//! The `status` subcommand: show what is on disk.

use anyhow::Result;
use twse_lib::{Config, Feed};

use crate::output::{
    build_snapshot_rows, print_csv, print_json, print_markdown, print_table, OutputFormat,
};

pub async fn run(config: &Config, format: &OutputFormat) -> Result<()> {
    let store = config.store();
    let mut snapshots = Vec::with_capacity(Feed::ALL.len());
    for feed in Feed::ALL {
        snapshots.push((feed.to_string(), store.info(feed).await));
    }

    let rows = build_snapshot_rows(&snapshots);
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Markdown => print_markdown(rows),
    }

    let mut board = config.board();
    board.load_cached().await;
    eprintln!("{} ({})", board.status_message(), config.cache_dir.display());
    Ok(())
}
