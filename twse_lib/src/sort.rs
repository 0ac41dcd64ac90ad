//! Re-ordering of the merged list by a selected field.
//!
//! Sorting is stateless: callers always pass the untouched info-order list,
//! so switching fields never compounds earlier sorts.
//!
//! Known limitation: absent or unparsable numbers compare as `0`, so they are
//! interleaved with genuine zeros rather than grouped at either end.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::StockDataError;
use crate::stock::{parse_change, parse_count, parse_decimal, MergedStock};

/// Field a merged list can be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Info-feed order; ignores the direction flag.
    #[default]
    Default,
    Code,
    Name,
    PeRatio,
    DividendYield,
    PbRatio,
    ClosingPrice,
    MonthlyAveragePrice,
    OpeningPrice,
    HighestPrice,
    LowestPrice,
    Change,
    Transaction,
    TradeVolume,
    TradeValue,
}

/// How values of a field are compared.
enum Comparison {
    Text,
    Decimal,
    Count,
    Change,
}

impl SortField {
    pub const ALL: [SortField; 15] = [
        SortField::Default,
        SortField::Code,
        SortField::Name,
        SortField::PeRatio,
        SortField::DividendYield,
        SortField::PbRatio,
        SortField::ClosingPrice,
        SortField::MonthlyAveragePrice,
        SortField::OpeningPrice,
        SortField::HighestPrice,
        SortField::LowestPrice,
        SortField::Change,
        SortField::Transaction,
        SortField::TradeVolume,
        SortField::TradeValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Default => "default",
            SortField::Code => "code",
            SortField::Name => "name",
            SortField::PeRatio => "pe-ratio",
            SortField::DividendYield => "dividend-yield",
            SortField::PbRatio => "pb-ratio",
            SortField::ClosingPrice => "closing-price",
            SortField::MonthlyAveragePrice => "monthly-average-price",
            SortField::OpeningPrice => "opening-price",
            SortField::HighestPrice => "highest-price",
            SortField::LowestPrice => "lowest-price",
            SortField::Change => "change",
            SortField::Transaction => "transaction",
            SortField::TradeVolume => "trade-volume",
            SortField::TradeValue => "trade-value",
        }
    }

    fn comparison(&self) -> Comparison {
        match self {
            SortField::Default | SortField::Code | SortField::Name => Comparison::Text,
            SortField::Change => Comparison::Change,
            SortField::Transaction | SortField::TradeVolume | SortField::TradeValue => {
                Comparison::Count
            }
            _ => Comparison::Decimal,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = StockDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        SortField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
                StockDataError::InvalidInput(format!(
                    "unknown sort field '{}', expected one of: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

fn decimal_key(raw: Option<&str>, parse: fn(&str) -> Option<f64>) -> f64 {
    raw.and_then(parse).unwrap_or(0.0)
}

fn compare_decimal(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Returns `base` ordered by `field`.
///
/// The sort is stable. A descending order is the ascending result reversed.
/// [`SortField::Default`] hands back `base` unchanged whatever `ascending` says.
pub fn sort_stocks(base: &[MergedStock], field: SortField, ascending: bool) -> Vec<MergedStock> {
    let mut sorted = base.to_vec();
    if field == SortField::Default {
        return sorted;
    }

    match field.comparison() {
        Comparison::Text => {
            sorted.sort_by(|a, b| a.field(field).cmp(&b.field(field)));
        }
        Comparison::Decimal => sorted.sort_by(|a, b| {
            compare_decimal(
                decimal_key(a.field(field), parse_decimal),
                decimal_key(b.field(field), parse_decimal),
            )
        }),
        Comparison::Change => sorted.sort_by(|a, b| {
            compare_decimal(
                decimal_key(a.field(field), parse_change),
                decimal_key(b.field(field), parse_change),
            )
        }),
        Comparison::Count => {
            sorted.sort_by_key(|s| s.field(field).and_then(parse_count).unwrap_or(0));
        }
    }

    if !ascending {
        sorted.reverse();
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(code: &str) -> MergedStock {
        MergedStock {
            code: code.to_string(),
            name: format!("name-{}", code),
            ..Default::default()
        }
    }

    fn codes(list: &[MergedStock]) -> Vec<&str> {
        list.iter().map(|s| s.code.as_str()).collect()
    }

    fn sample() -> Vec<MergedStock> {
        let mut a = stock("2330");
        a.trade_value = Some("1,234,567".to_string());
        a.change = Some("+4.0000".to_string());
        a.pe_ratio = Some("25.40".to_string());
        let mut b = stock("1101");
        b.trade_value = Some("987,654".to_string());
        b.change = Some("-1.50".to_string());
        b.pe_ratio = Some("15.82".to_string());
        let mut c = stock("2603");
        c.change = Some("\u{2212}2.00".to_string());
        c.pe_ratio = Some("".to_string());
        vec![a, b, c]
    }

    #[test]
    fn default_keeps_base_order() {
        let base = sample();
        assert_eq!(codes(&sort_stocks(&base, SortField::Default, true)), vec!["2330", "1101", "2603"]);
        assert_eq!(codes(&sort_stocks(&base, SortField::Default, false)), vec!["2330", "1101", "2603"]);
    }

    #[test]
    fn code_sort_is_lexicographic() {
        let base = vec![stock("9958"), stock("00878"), stock("2330")];
        assert_eq!(codes(&sort_stocks(&base, SortField::Code, true)), vec!["00878", "2330", "9958"]);
    }

    #[test]
    fn descending_is_reversed_ascending() {
        let base = sample();
        let mut asc = sort_stocks(&base, SortField::Code, true);
        asc.reverse();
        assert_eq!(asc, sort_stocks(&base, SortField::Code, false));
    }

    #[test]
    fn trade_value_sorts_numerically() {
        let base = sample();
        let sorted = sort_stocks(&base, SortField::TradeValue, true);
        // 2603 has no trade value and compares as zero
        assert_eq!(codes(&sorted), vec!["2603", "1101", "2330"]);
        assert_eq!(sorted[1].trade_value.as_deref(), Some("987,654"));
        assert_eq!(sorted[2].trade_value.as_deref(), Some("1,234,567"));
    }

    #[test]
    fn change_handles_typographic_minus() {
        let base = sample();
        let sorted = sort_stocks(&base, SortField::Change, true);
        assert_eq!(codes(&sorted), vec!["2603", "1101", "2330"]);
    }

    #[test]
    fn ascii_and_typographic_minus_tie() {
        let mut a = stock("A");
        a.change = Some("-1.50".to_string());
        let mut b = stock("B");
        b.change = Some("\u{2212}1.50".to_string());
        let mut c = stock("C");
        c.change = Some("-1.00".to_string());
        let sorted = sort_stocks(&[a, b, c], SortField::Change, true);
        assert_eq!(codes(&sorted), vec!["A", "B", "C"]);
    }

    #[test]
    fn unparsable_decimal_compares_as_zero() {
        let base = sample();
        let sorted = sort_stocks(&base, SortField::PeRatio, true);
        assert_eq!(codes(&sorted), vec!["2603", "1101", "2330"]);
    }

    #[test]
    fn equal_keys_keep_base_order() {
        let base = vec![stock("3"), stock("1"), stock("2")];
        let sorted = sort_stocks(&base, SortField::ClosingPrice, true);
        assert_eq!(codes(&sorted), vec!["3", "1", "2"]);
    }

    #[test]
    fn repeated_sorts_are_not_cumulative() {
        let base = sample();
        let _ = sort_stocks(&base, SortField::Change, false);
        let again = sort_stocks(&base, SortField::TradeValue, true);
        assert_eq!(again, sort_stocks(&sample(), SortField::TradeValue, true));
    }

    #[test]
    fn parse_field_names() {
        assert_eq!("trade-value".parse::<SortField>().unwrap(), SortField::TradeValue);
        assert_eq!("PE_RATIO".parse::<SortField>().unwrap(), SortField::PeRatio);
        for field in SortField::ALL {
            assert_eq!(field.to_string().parse::<SortField>().unwrap(), field);
        }
        let err = "volume".parse::<SortField>().unwrap_err();
        assert!(matches!(err, StockDataError::InvalidInput(_)));
    }
}
