//! The `sync` subcommand: download all feeds into the snapshot directory.

use anyhow::Result;
use twse_lib::Config;

use crate::output::{
    build_sync_rows, print_csv, print_json, print_markdown, print_table, OutputFormat,
};

pub async fn run(config: &Config, format: &OutputFormat) -> Result<()> {
    eprintln!("Syncing feeds into {}", config.cache_dir.display());
    let summary = config.orchestrator().sync().await?;

    let rows = build_sync_rows(&summary);
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Markdown => print_markdown(rows),
    }

    if summary.is_complete() {
        eprintln!("All feeds stored in {}", summary.cache_dir.display());
    } else {
        eprintln!(
            "{} of {} feeds failed; previous snapshots were kept for those",
            summary.failed.len(),
            summary.failed.len() + summary.succeeded.len()
        );
    }
    Ok(())
}
