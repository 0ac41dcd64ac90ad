//! Raw record types, one per feed, exactly as the exchange delivers them.
//!
//! Every numeric value arrives pre-formatted (thousands separators, sign
//! glyphs), so values stay `String`s here.

mod lenient;

mod info;
pub use self::info::{InfoRecord, StockCode};

mod day_average;
pub use self::day_average::DayAverageRecord;

mod day_all;
pub use self::day_all::DayAllRecord;
