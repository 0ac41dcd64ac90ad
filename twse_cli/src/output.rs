use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use twse_lib::{ChangeDirection, MergedStock, PriceTrend, SnapshotInfo, SyncSummary};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!(
                "unknown output format '{}', expected table, json, csv, or markdown",
                other
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct StockRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    closing_price: String,
    #[tabled(rename = "Trend")]
    #[serde(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Dir")]
    #[serde(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    opening_price: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    highest_price: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    lowest_price: String,
    #[tabled(rename = "Monthly Avg")]
    #[serde(rename = "Monthly Avg")]
    monthly_average_price: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    trade_volume: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    trade_value: String,
    #[tabled(rename = "Trades")]
    #[serde(rename = "Trades")]
    transaction: String,
    #[tabled(rename = "P/E")]
    #[serde(rename = "P/E")]
    pe_ratio: String,
    #[tabled(rename = "Yield %")]
    #[serde(rename = "Yield %")]
    dividend_yield: String,
    #[tabled(rename = "P/B")]
    #[serde(rename = "P/B")]
    pb_ratio: String,
}

#[derive(Tabled, Serialize)]
pub struct SyncRow {
    #[tabled(rename = "Feed")]
    #[serde(rename = "Feed")]
    feed: String,
    #[tabled(rename = "Result")]
    #[serde(rename = "Result")]
    result: String,
    #[tabled(rename = "Detail")]
    #[serde(rename = "Detail")]
    detail: String,
}

#[derive(Tabled, Serialize)]
pub struct SnapshotRow {
    #[tabled(rename = "Feed")]
    #[serde(rename = "Feed")]
    feed: String,
    #[tabled(rename = "File")]
    #[serde(rename = "File")]
    file: String,
    #[tabled(rename = "Bytes")]
    #[serde(rename = "Bytes")]
    bytes: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    updated: String,
}

// -- Row builders --

/// `missing` fills cells whose feed had no row for the stock.
pub fn build_stock_rows(stocks: &[MergedStock], missing: &str) -> Vec<StockRow> {
    let cell = |value: &Option<String>| value.clone().unwrap_or_else(|| missing.to_string());
    stocks
        .iter()
        .map(|s| StockRow {
            code: s.code.clone(),
            name: s.name.clone(),
            closing_price: cell(&s.closing_price),
            trend: trend_marker(s.price_trend()).to_string(),
            change: cell(&s.change),
            direction: direction_marker(s.change_direction()).to_string(),
            opening_price: cell(&s.opening_price),
            highest_price: cell(&s.highest_price),
            lowest_price: cell(&s.lowest_price),
            monthly_average_price: cell(&s.monthly_average_price),
            trade_volume: cell(&s.trade_volume),
            trade_value: cell(&s.trade_value),
            transaction: cell(&s.transaction),
            pe_ratio: cell(&s.pe_ratio),
            dividend_yield: cell(&s.dividend_yield),
            pb_ratio: cell(&s.pb_ratio),
        })
        .collect()
}

pub fn build_sync_rows(summary: &SyncSummary) -> Vec<SyncRow> {
    let ok = summary.succeeded.iter().map(|(feed, path)| SyncRow {
        feed: feed.to_string(),
        result: "ok".to_string(),
        detail: path.display().to_string(),
    });
    let failed = summary.failed.iter().map(|f| SyncRow {
        feed: f.feed.to_string(),
        result: "failed".to_string(),
        detail: f.error.to_string(),
    });
    ok.chain(failed).collect()
}

pub fn build_snapshot_rows(snapshots: &[(String, Option<SnapshotInfo>)]) -> Vec<SnapshotRow> {
    snapshots
        .iter()
        .map(|(feed, info)| match info {
            Some(info) => SnapshotRow {
                feed: feed.clone(),
                file: info.path.display().to_string(),
                bytes: info.bytes.to_string(),
                updated: info.modified.map(format_time).unwrap_or_default(),
            },
            None => SnapshotRow {
                feed: feed.clone(),
                file: "(not synced)".to_string(),
                bytes: String::new(),
                updated: String::new(),
            },
        })
        .collect()
}

fn trend_marker(trend: PriceTrend) -> &'static str {
    match trend {
        PriceTrend::Above => "▲",
        PriceTrend::Below => "▼",
        PriceTrend::Flat => "=",
        PriceTrend::Unknown => "",
    }
}

fn direction_marker(direction: ChangeDirection) -> &'static str {
    match direction {
        ChangeDirection::Up => "+",
        ChangeDirection::Down => "-",
        ChangeDirection::Unchanged => "0",
        ChangeDirection::Unknown => "",
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// -- Printers --

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    println!("{}", Table::new(rows));
}

pub fn print_markdown<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
