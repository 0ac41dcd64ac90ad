//! The `list` subcommand: print the merged board.

use anyhow::Result;
use clap::Args;
use twse_lib::{Config, SortField};

use crate::output::{
    build_stock_rows, print_csv, print_json, print_markdown, print_table, OutputFormat,
};

#[derive(Args)]
pub struct ListArgs {
    /// Sort field: default, code, name, pe-ratio, dividend-yield, pb-ratio,
    /// closing-price, monthly-average-price, opening-price, highest-price,
    /// lowest-price, change, transaction, trade-volume, trade-value
    #[arg(long, default_value = "default")]
    pub sort_by: String,

    /// Sort ascending (descending otherwise)
    #[arg(long)]
    pub asc: bool,

    /// Download fresh snapshots before listing
    #[arg(long)]
    pub sync: bool,

    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

pub async fn run(args: &ListArgs, config: &Config, format: &OutputFormat) -> Result<()> {
    let field: SortField = args.sort_by.parse()?;
    let mut board = config.board();

    if args.sync {
        board.refresh().await?;
    } else if board.load_cached().await == 0 {
        eprintln!(
            "No snapshots in {}; run `twse sync` or pass --sync",
            config.cache_dir.display()
        );
    }
    eprintln!("{}", board.status_message());

    let mut stocks = board.sort(field, args.asc);
    if let Some(limit) = args.limit {
        stocks.truncate(limit);
    }

    match format {
        OutputFormat::Table => print_table(build_stock_rows(&stocks, "-")),
        OutputFormat::Json => print_json(&stocks),
        OutputFormat::Csv => print_csv(&build_stock_rows(&stocks, ""))?,
        OutputFormat::Markdown => print_markdown(build_stock_rows(&stocks, "-")),
    }
    Ok(())
}
