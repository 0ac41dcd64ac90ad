use serde::{Deserialize, Serialize};

use super::lenient::{opt_text, text};
use super::StockCode;

/// A row of the `STOCK_DAY_ALL` feed: the full trading summary of the day.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DayAllRecord {
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(deserialize_with = "text")]
    pub code: StockCode,

    #[serde(default, deserialize_with = "text")]
    pub name: String,

    /// Shares traded.
    #[serde(default, deserialize_with = "opt_text")]
    pub trade_volume: Option<String>,

    /// Turnover in TWD.
    #[serde(default, deserialize_with = "opt_text")]
    pub trade_value: Option<String>,

    #[serde(default, deserialize_with = "opt_text")]
    pub opening_price: Option<String>,

    #[serde(default, deserialize_with = "opt_text")]
    pub highest_price: Option<String>,

    #[serde(default, deserialize_with = "opt_text")]
    pub lowest_price: Option<String>,

    #[serde(default, deserialize_with = "opt_text")]
    pub closing_price: Option<String>,

    /// Signed price change; may use the typographic minus `U+2212`.
    #[serde(default, deserialize_with = "opt_text")]
    pub change: Option<String>,

    /// Number of transactions.
    #[serde(default, deserialize_with = "opt_text")]
    pub transaction: Option<String>,
}
