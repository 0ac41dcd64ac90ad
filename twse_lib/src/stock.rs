//! The unified per-security record and the number parsing shared by
//! sorting and display.

use serde::{Deserialize, Serialize};

use crate::sort::SortField;

/// One security with the values of all three feeds joined by code.
///
/// Values are the exchange's pre-formatted strings. `None` means the feed
/// that supplies the field had no row for this code; `Some("")` is an empty
/// value the exchange actually sent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MergedStock {
    pub code: String,
    pub name: String,
    pub pe_ratio: Option<String>,
    pub dividend_yield: Option<String>,
    pub pb_ratio: Option<String>,
    pub closing_price: Option<String>,
    pub monthly_average_price: Option<String>,
    pub trade_volume: Option<String>,
    pub trade_value: Option<String>,
    pub opening_price: Option<String>,
    pub highest_price: Option<String>,
    pub lowest_price: Option<String>,
    pub change: Option<String>,
    pub transaction: Option<String>,
}

/// Closing price relative to the monthly average.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceTrend {
    Above,
    Below,
    Flat,
    Unknown,
}

/// Sign of the day's price change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Unchanged,
    Unknown,
}

impl MergedStock {
    /// Raw value backing `field`. `None` for [`SortField::Default`].
    pub fn field(&self, field: SortField) -> Option<&str> {
        let value = match field {
            SortField::Default => return None,
            SortField::Code => return Some(self.code.as_str()),
            SortField::Name => return Some(self.name.as_str()),
            SortField::PeRatio => &self.pe_ratio,
            SortField::DividendYield => &self.dividend_yield,
            SortField::PbRatio => &self.pb_ratio,
            SortField::ClosingPrice => &self.closing_price,
            SortField::MonthlyAveragePrice => &self.monthly_average_price,
            SortField::OpeningPrice => &self.opening_price,
            SortField::HighestPrice => &self.highest_price,
            SortField::LowestPrice => &self.lowest_price,
            SortField::Change => &self.change,
            SortField::Transaction => &self.transaction,
            SortField::TradeVolume => &self.trade_volume,
            SortField::TradeValue => &self.trade_value,
        };
        value.as_deref()
    }

    pub fn price_trend(&self) -> PriceTrend {
        let closing = self.closing_price.as_deref().and_then(parse_decimal);
        let average = self.monthly_average_price.as_deref().and_then(parse_decimal);
        match (closing, average) {
            (Some(c), Some(a)) if c > a => PriceTrend::Above,
            (Some(c), Some(a)) if c < a => PriceTrend::Below,
            (Some(_), Some(_)) => PriceTrend::Flat,
            _ => PriceTrend::Unknown,
        }
    }

    pub fn change_direction(&self) -> ChangeDirection {
        match self.change.as_deref() {
            None => ChangeDirection::Unknown,
            Some(c) if c.starts_with('-') || c.starts_with('\u{2212}') => ChangeDirection::Down,
            Some("0") | Some("0.00") | Some("0.0000") => ChangeDirection::Unchanged,
            Some(_) => ChangeDirection::Up,
        }
    }
}

/// Parses a decimal such as `"1,234.56"`. Thousands separators are dropped.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses an integer count such as `"12,304,559"`.
pub fn parse_count(raw: &str) -> Option<i64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<i64>().ok()
}

/// Parses a price change, accepting an explicit `+` and the typographic
/// minus `U+2212`.
pub fn parse_change(raw: &str) -> Option<f64> {
    let normalized: String = raw
        .chars()
        .filter(|c| *c != '+')
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    parse_decimal(&normalized)
}
