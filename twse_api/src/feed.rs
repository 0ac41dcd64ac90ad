//! The three daily exchange-report feeds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the upstream daily feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feed {
    /// P/E ratio, dividend yield and P/B ratio per security (`BWIBBU_ALL`).
    Info,
    /// Closing price and monthly average price (`STOCK_DAY_AVG_ALL`).
    DayAverage,
    /// Full day trading summary (`STOCK_DAY_ALL`).
    DayAll,
}

impl Feed {
    /// All feeds, in sync order.
    pub const ALL: [Feed; 3] = [Feed::Info, Feed::DayAverage, Feed::DayAll];

    /// Report identifier used by the exchange API.
    pub fn report_id(&self) -> &'static str {
        match self {
            Feed::Info => "BWIBBU_ALL",
            Feed::DayAverage => "STOCK_DAY_AVG_ALL",
            Feed::DayAll => "STOCK_DAY_ALL",
        }
    }

    /// Path of the endpoint relative to the API base URL.
    pub fn path(&self) -> String {
        format!("/exchangeReport/{}", self.report_id())
    }

    /// File name the snapshot of this feed is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.report_id())
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Feed::Info => "info",
            Feed::DayAverage => "day-average",
            Feed::DayAll => "day-all",
        };
        write!(f, "{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_report_ids() {
        assert_eq!(Feed::Info.path(), "/exchangeReport/BWIBBU_ALL");
        assert_eq!(Feed::DayAverage.path(), "/exchangeReport/STOCK_DAY_AVG_ALL");
        assert_eq!(Feed::DayAll.path(), "/exchangeReport/STOCK_DAY_ALL");
    }

    #[test]
    fn file_names_are_distinct() {
        let names: std::collections::HashSet<String> =
            Feed::ALL.iter().map(|f| f.file_name()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains("BWIBBU_ALL.json"));
    }

    #[test]
    fn display_matches_serde_name() {
        for feed in Feed::ALL {
            let json = serde_json::to_string(&feed).unwrap();
            assert_eq!(json, format!("\"{}\"", feed));
        }
        assert_eq!(Feed::DayAverage.to_string(), "day-average");
    }
}
