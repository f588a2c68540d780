use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::search::de::{parse_integer, parse_timestamp};
use crate::services::resolver::VncInfo;

/// Collapse repeated scans of the same host to the most recent one.
///
/// For every `ip` the record with the strictly greatest `createdat` wins
/// (the first one seen on ties). Scans stamped at or before the Unix epoch
/// never win. Every input record whose `id` belongs to a winner is kept,
/// in input order. Records without a usable `ip`, `id` or `createdat` are
/// dropped.
pub fn remove_duplicates(records: Vec<VncInfo>) -> Vec<VncInfo> {
    let mut latest: HashMap<&str, (DateTime<Utc>, i64)> = HashMap::new();

    for record in &records {
        let Some((ip, created, id)) = key_fields(record) else {
            continue;
        };
        if created.timestamp_millis() <= 0 {
            continue;
        }
        let newer = latest.get(ip).map_or(true, |(best, _)| created > *best);
        if newer {
            latest.insert(ip, (created, id));
        }
    }

    let winners: HashSet<i64> = latest.values().map(|(_, id)| *id).collect();

    records
        .iter()
        .filter(|record| {
            key_fields(record).map_or(false, |(_, _, id)| winners.contains(&id))
        })
        .cloned()
        .collect()
}

fn key_fields(record: &VncInfo) -> Option<(&str, DateTime<Utc>, i64)> {
    let ip = record.get("ip")?.as_str()?;
    let created = parse_timestamp(record.get("createdat")?)?;
    let id = parse_integer(record.get("id")?)?;
    Some((ip, created, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn info(id: i64, createdat: i64, ip: &str) -> VncInfo {
        match json!({ "id": id, "createdat": createdat, "ip": ip }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn ids(records: &[VncInfo]) -> Vec<i64> {
        records
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn keeps_latest_scan_per_ip() {
        let records = vec![
            info(1, 1, "0.0.0.0"),
            info(2, 2, "0.0.0.0"),
            info(3, 1, "0.0.0.1"),
        ];

        assert_eq!(ids(&remove_duplicates(records)), vec![2, 3]);
    }

    #[test]
    fn first_record_wins_on_equal_timestamps() {
        let records = vec![info(7, 5, "10.0.0.1"), info(8, 5, "10.0.0.1")];

        assert_eq!(ids(&remove_duplicates(records)), vec![7]);
    }

    #[test]
    fn epoch_stamped_records_never_win() {
        let records = vec![info(1, 0, "10.0.0.1"), info(2, 0, "10.0.0.2")];

        assert!(remove_duplicates(records).is_empty());
    }

    #[test]
    fn records_missing_key_fields_are_dropped() {
        let mut no_ip = info(1, 10, "x");
        no_ip.remove("ip");
        let mut bad_time = info(2, 10, "10.0.0.2");
        bad_time.insert("createdat".into(), json!("not a time"));

        let records = vec![no_ip, bad_time, info(3, 10, "10.0.0.3")];

        assert_eq!(ids(&remove_duplicates(records)), vec![3]);
    }

    #[test]
    fn string_ids_and_timestamps_are_compared_numerically() {
        let mut older = info(0, 0, "10.0.0.1");
        older.insert("id".into(), json!("11"));
        older.insert("createdat".into(), json!("1700000000"));
        let mut newer = info(0, 0, "10.0.0.1");
        newer.insert("id".into(), json!("12"));
        newer.insert("createdat".into(), json!("1700000001"));

        let kept = remove_duplicates(vec![older, newer]);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["id"], json!("12"));
    }

    proptest! {
        #[test]
        fn at_most_one_record_per_ip(
            scans in prop::collection::vec((1i64..1_000, 0usize..5), 0..40)
        ) {
            let records: Vec<VncInfo> = scans
                .iter()
                .enumerate()
                .map(|(id, (created, host))| info(id as i64, *created, &format!("10.0.0.{}", host)))
                .collect();

            let kept = remove_duplicates(records.clone());

            let mut seen = HashSet::new();
            for record in &kept {
                prop_assert!(seen.insert(record["ip"].as_str().unwrap().to_string()));
            }

            // Every distinct ip in the input survives exactly once.
            let distinct: HashSet<String> = records
                .iter()
                .map(|r| r["ip"].as_str().unwrap().to_string())
                .collect();
            prop_assert_eq!(kept.len(), distinct.len());

            // The survivor carries the newest timestamp for its ip.
            for record in &kept {
                let newest = records
                    .iter()
                    .filter(|r| r["ip"] == record["ip"])
                    .map(|r| r["createdat"].as_i64().unwrap())
                    .max()
                    .unwrap();
                prop_assert_eq!(record["createdat"].as_i64().unwrap(), newest);
            }
        }
    }
}
