//! Joins the three feeds into [`MergedStock`] rows, anchored on the info feed.

use std::collections::HashMap;

use twse_api::types::{DayAllRecord, DayAverageRecord, InfoRecord};
use twse_api::Feed;

use crate::stock::MergedStock;
use crate::store::SnapshotStore;

/// Merges the three feeds by code.
///
/// The output has exactly one row per info record, in info order. Fields
/// supplied by the day-average or day-all feed stay `None` when that feed has
/// no row for the code. The closing price comes from the day-average feed,
/// then from the day-all feed. Duplicate codes within a feed: last row wins.
pub fn merge(
    infos: &[InfoRecord],
    averages: &[DayAverageRecord],
    day_alls: &[DayAllRecord],
) -> Vec<MergedStock> {
    let average_by_code: HashMap<&str, &DayAverageRecord> =
        averages.iter().map(|r| (r.code.as_str(), r)).collect();
    let day_all_by_code: HashMap<&str, &DayAllRecord> =
        day_alls.iter().map(|r| (r.code.as_str(), r)).collect();

    infos
        .iter()
        .map(|info| {
            let avg = average_by_code.get(info.code.as_str()).copied();
            let all = day_all_by_code.get(info.code.as_str()).copied();
            MergedStock {
                code: info.code.clone(),
                name: info.name.clone(),
                pe_ratio: info.pe_ratio.clone(),
                dividend_yield: info.dividend_yield.clone(),
                pb_ratio: info.pb_ratio.clone(),
                closing_price: avg
                    .and_then(|a| a.closing_price.clone())
                    .or_else(|| all.and_then(|a| a.closing_price.clone())),
                monthly_average_price: avg.and_then(|a| a.monthly_average_price.clone()),
                trade_volume: all.and_then(|a| a.trade_volume.clone()),
                trade_value: all.and_then(|a| a.trade_value.clone()),
                opening_price: all.and_then(|a| a.opening_price.clone()),
                highest_price: all.and_then(|a| a.highest_price.clone()),
                lowest_price: all.and_then(|a| a.lowest_price.clone()),
                change: all.and_then(|a| a.change.clone()),
                transaction: all.and_then(|a| a.transaction.clone()),
            }
        })
        .collect()
}

/// Reads the current snapshots and merges them. Never touches the network.
///
/// Missing or unreadable snapshots count as empty feeds, so a partial sync
/// still yields a partially populated list.
pub async fn load_merged(store: &SnapshotStore) -> Vec<MergedStock> {
    let infos: Vec<InfoRecord> = store.read_or_empty(Feed::Info).await;
    let averages: Vec<DayAverageRecord> = store.read_or_empty(Feed::DayAverage).await;
    let day_alls: Vec<DayAllRecord> = store.read_or_empty(Feed::DayAll).await;
    tracing::debug!(
        "Merging {} info, {} day-average, {} day-all rows",
        infos.len(),
        averages.len(),
        day_alls.len()
    );
    merge(&infos, &averages, &day_alls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(code: &str) -> InfoRecord {
        InfoRecord {
            date: None,
            code: code.to_string(),
            name: format!("name-{}", code),
            pe_ratio: Some("10.00".to_string()),
            dividend_yield: None,
            pb_ratio: Some("1.20".to_string()),
        }
    }

    fn average(code: &str, closing: Option<&str>, monthly: &str) -> DayAverageRecord {
        DayAverageRecord {
            date: None,
            code: code.to_string(),
            name: format!("name-{}", code),
            closing_price: closing.map(str::to_string),
            monthly_average_price: Some(monthly.to_string()),
        }
    }

    fn day_all(code: &str, closing: &str) -> DayAllRecord {
        DayAllRecord {
            date: None,
            code: code.to_string(),
            name: format!("name-{}", code),
            trade_volume: Some("1,000".to_string()),
            trade_value: Some("580,000".to_string()),
            opening_price: Some("578.00".to_string()),
            highest_price: Some("583.00".to_string()),
            lowest_price: Some("576.00".to_string()),
            closing_price: Some(closing.to_string()),
            change: Some("+4.0000".to_string()),
            transaction: Some("41".to_string()),
        }
    }

    #[test]
    fn output_follows_info_rows() {
        let infos = vec![info("2603"), info("1101"), info("2330")];
        let merged = merge(&infos, &[], &[day_all("1101", "32.45")]);
        let codes: Vec<&str> = merged.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["2603", "1101", "2330"]);
    }

    #[test]
    fn rows_without_info_are_dropped() {
        let merged = merge(
            &[info("1101")],
            &[average("2330", Some("580.00"), "570.00")],
            &[day_all("2330", "580.00")],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].code, "1101");
    }

    #[test]
    fn unmatched_code_leaves_supplemental_fields_absent() {
        let merged = merge(&[info("9999")], &[average("2330", Some("1"), "1")], &[day_all("2330", "1")]);
        let stock = &merged[0];
        assert_eq!(stock.pe_ratio.as_deref(), Some("10.00"));
        assert_eq!(stock.closing_price, None);
        assert_eq!(stock.monthly_average_price, None);
        assert_eq!(stock.trade_volume, None);
        assert_eq!(stock.trade_value, None);
        assert_eq!(stock.opening_price, None);
        assert_eq!(stock.highest_price, None);
        assert_eq!(stock.lowest_price, None);
        assert_eq!(stock.change, None);
        assert_eq!(stock.transaction, None);
    }

    #[test]
    fn closing_price_prefers_day_average() {
        let merged = merge(
            &[info("2330")],
            &[average("2330", Some("579.00"), "570.00")],
            &[day_all("2330", "580.00")],
        );
        assert_eq!(merged[0].closing_price.as_deref(), Some("579.00"));
        assert_eq!(merged[0].monthly_average_price.as_deref(), Some("570.00"));
        assert_eq!(merged[0].trade_volume.as_deref(), Some("1,000"));
    }

    #[test]
    fn closing_price_falls_back_to_day_all() {
        let merged = merge(&[info("2330")], &[], &[day_all("2330", "580.00")]);
        assert_eq!(merged[0].closing_price.as_deref(), Some("580.00"));
        assert_eq!(merged[0].monthly_average_price, None);
    }

    #[test]
    fn closing_price_falls_back_when_average_value_is_null() {
        let merged = merge(
            &[info("2330")],
            &[average("2330", None, "570.00")],
            &[day_all("2330", "580.00")],
        );
        assert_eq!(merged[0].closing_price.as_deref(), Some("580.00"));
    }

    #[test]
    fn empty_average_value_is_kept() {
        let merged = merge(
            &[info("2330")],
            &[average("2330", Some(""), "570.00")],
            &[day_all("2330", "580.00")],
        );
        assert_eq!(merged[0].closing_price.as_deref(), Some(""));
    }

    #[test]
    fn duplicate_codes_last_row_wins() {
        let merged = merge(
            &[info("2330")],
            &[
                average("2330", Some("1.00"), "1.00"),
                average("2330", Some("2.00"), "2.00"),
            ],
            &[],
        );
        assert_eq!(merged[0].closing_price.as_deref(), Some("2.00"));
    }

    #[test]
    fn no_info_rows_yield_empty_list() {
        let merged = merge(&[], &[average("2330", Some("1"), "1")], &[day_all("2330", "1")]);
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn load_without_snapshots_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(load_merged(&store).await.is_empty());
    }

    #[tokio::test]
    async fn load_with_only_info_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        std::fs::write(
            store.path_for(Feed::Info),
            serde_json::to_string(&vec![info("1101"), info("2330")]).unwrap(),
        )
        .unwrap();
        std::fs::write(store.path_for(Feed::DayAll), "not json").unwrap();

        let merged = load_merged(&store).await;
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|s| s.closing_price.is_none()));
    }

    #[tokio::test]
    async fn odd_rows_do_not_drop_the_feed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        std::fs::write(
            store.path_for(Feed::Info),
            r#"[{"Code":"2330","Name":"台積電","PEratio":"25.40"},{"Code":"9999","Name":null}]"#,
        )
        .unwrap();
        std::fs::write(
            store.path_for(Feed::DayAll),
            r#"[{"Code":"2330","Name":"台積電","ClosingPrice":"580.00","Transaction":6312}]"#,
        )
        .unwrap();

        let merged = load_merged(&store).await;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].closing_price.as_deref(), Some("580.00"));
        assert_eq!(merged[0].transaction.as_deref(), Some("6312"));
        assert_eq!(merged[1].code, "9999");
        assert_eq!(merged[1].name, "");
    }
}
