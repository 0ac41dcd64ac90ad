use serde::{Deserialize, Serialize};

use super::lenient::{opt_text, text};
use super::StockCode;

/// A row of the `STOCK_DAY_AVG_ALL` feed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DayAverageRecord {
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(deserialize_with = "text")]
    pub code: StockCode,

    #[serde(default, deserialize_with = "text")]
    pub name: String,

    #[serde(default, deserialize_with = "opt_text")]
    pub closing_price: Option<String>,

    #[serde(default, deserialize_with = "opt_text")]
    pub monthly_average_price: Option<String>,
}
