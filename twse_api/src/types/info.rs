use serde::{Deserialize, Serialize};

use super::lenient::{opt_text, text};

/// Security code, e.g. `2330`. The join key across all feeds.
pub type StockCode = String;

/// A row of the `BWIBBU_ALL` feed: valuation ratios per security.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InfoRecord {
    #[serde(rename = "Date", default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "Code", deserialize_with = "text")]
    pub code: StockCode,

    #[serde(rename = "Name", default, deserialize_with = "text")]
    pub name: String,

    #[serde(rename = "PEratio", default, deserialize_with = "opt_text")]
    pub pe_ratio: Option<String>,

    #[serde(rename = "DividendYield", default, deserialize_with = "opt_text")]
    pub dividend_yield: Option<String>,

    #[serde(rename = "PBratio", default, deserialize_with = "opt_text")]
    pub pb_ratio: Option<String>,
}
