//! Read-only aggregation over the record set.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::model::WeatherRecord;

/// Per-city deduplicated view: one record per distinct city.
#[derive(Debug, Clone, Serialize)]
pub struct LatestPerCity {
    pub count: usize,
    pub data: Vec<WeatherRecord>,
}

/// Summary statistics over every record ever ingested.
///
/// The temperature fields are `None` exactly when `total_records` is zero;
/// a mean of 0.0 over a non-empty set is still reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherStats {
    pub total_records: usize,
    pub unique_cities: usize,
    pub average_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
}

pub struct Aggregator;

impl Aggregator {
    /// The most recent record for each distinct city value, sorted by city
    /// name ascending.
    ///
    /// "Most recent" means the greatest `fetched_at`; when two records of a
    /// city share a timestamp, the one with the larger id (the later
    /// insertion) wins. That tie-break is part of the contract.
    pub fn latest_per_city(records: &[WeatherRecord]) -> LatestPerCity {
        let mut latest: HashMap<&str, &WeatherRecord> = HashMap::new();

        for record in records {
            latest
                .entry(record.city.as_str())
                .and_modify(|current| {
                    if (record.fetched_at, record.id) > (current.fetched_at, current.id) {
                        *current = record;
                    }
                })
                .or_insert(record);
        }

        let mut data: Vec<WeatherRecord> = latest.into_values().cloned().collect();
        data.sort_by(|a, b| a.city.cmp(&b.city));

        LatestPerCity { count: data.len(), data }
    }

    /// Statistics over the entire record set; every historical fetch counts.
    pub fn statistics(records: &[WeatherRecord]) -> WeatherStats {
        if records.is_empty() {
            return WeatherStats {
                total_records: 0,
                unique_cities: 0,
                average_temperature: None,
                max_temperature: None,
                min_temperature: None,
            };
        }

        let cities: HashSet<&str> = records.iter().map(|r| r.city.as_str()).collect();

        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for record in records {
            sum += record.temperature;
            max = max.max(record.temperature);
            min = min.min(record.temperature);
        }

        let mean = sum / records.len() as f64;

        WeatherStats {
            total_records: records.len(),
            unique_cities: cities.len(),
            average_temperature: Some(round2(mean)),
            max_temperature: Some(max),
            min_temperature: Some(min),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_record(id: i64, city: &str, temperature: f64, hour: u32) -> WeatherRecord {
        WeatherRecord {
            id,
            city: city.to_owned(),
            country: "DE".to_owned(),
            temperature,
            feels_like: temperature,
            humidity: 60,
            pressure: 1012,
            description: "clear sky".to_owned(),
            wind_speed: 3.4,
            visibility: Some(9000),
            fetched_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn latest_keeps_one_record_per_city() {
        let records = vec![
            make_record(1, "Berlin", 10.0, 8),
            make_record(2, "Berlin", 12.0, 9),
            make_record(3, "Paris", 14.0, 8),
        ];

        let latest = Aggregator::latest_per_city(&records);

        assert_eq!(latest.count, 2);
        assert_eq!(latest.data.len(), 2);

        for record in &latest.data {
            for other in records.iter().filter(|r| r.city == record.city) {
                assert!(other.fetched_at <= record.fetched_at);
            }
        }
    }

    #[test]
    fn latest_is_sorted_by_city_ascending() {
        let records = vec![
            make_record(1, "Paris", 14.0, 8),
            make_record(2, "Amsterdam", 11.0, 8),
            make_record(3, "Berlin", 10.0, 8),
        ];

        let latest = Aggregator::latest_per_city(&records);
        let cities: Vec<&str> = latest.data.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Amsterdam", "Berlin", "Paris"]);
    }

    #[test]
    fn equal_timestamps_resolve_to_the_larger_id() {
        let records = vec![
            make_record(1, "Berlin", 10.0, 8),
            make_record(2, "Berlin", 12.0, 8),
        ];

        let latest = Aggregator::latest_per_city(&records);
        assert_eq!(latest.data[0].id, 2);
        assert_eq!(latest.data[0].temperature, 12.0);

        // Same outcome whichever order the records arrive in.
        let reversed: Vec<WeatherRecord> = records.into_iter().rev().collect();
        let latest = Aggregator::latest_per_city(&reversed);
        assert_eq!(latest.data[0].id, 2);
    }

    #[test]
    fn latest_of_empty_store_is_empty() {
        let latest = Aggregator::latest_per_city(&[]);
        assert_eq!(latest.count, 0);
        assert!(latest.data.is_empty());
    }

    #[test]
    fn statistics_of_empty_store_are_all_absent() {
        let stats = Aggregator::statistics(&[]);

        assert_eq!(
            stats,
            WeatherStats {
                total_records: 0,
                unique_cities: 0,
                average_temperature: None,
                max_temperature: None,
                min_temperature: None,
            }
        );
    }

    #[test]
    fn statistics_cover_every_historical_record() {
        let records = vec![
            make_record(1, "Berlin", 10.0, 8),
            make_record(2, "Berlin", 20.0, 9),
            make_record(3, "Paris", 30.0, 8),
        ];

        let stats = Aggregator::statistics(&records);

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.unique_cities, 2);
        assert_eq!(stats.average_temperature, Some(20.0));
        assert_eq!(stats.max_temperature, Some(30.0));
        assert_eq!(stats.min_temperature, Some(10.0));
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let records = vec![
            make_record(1, "Berlin", 10.0, 8),
            make_record(2, "Paris", 10.1, 8),
            make_record(3, "Oslo", 10.1, 8),
        ];

        let stats = Aggregator::statistics(&records);
        assert_eq!(stats.average_temperature, Some(10.07));
    }

    #[test]
    fn zero_mean_over_records_is_still_reported() {
        let records = vec![
            make_record(1, "Berlin", -5.0, 8),
            make_record(2, "Paris", 5.0, 8),
        ];

        let stats = Aggregator::statistics(&records);
        assert_eq!(stats.average_temperature, Some(0.0));
    }

    #[test]
    fn city_distinctness_is_exact_string_match() {
        let records = vec![
            make_record(1, "berlin", 10.0, 8),
            make_record(2, "Berlin", 12.0, 8),
        ];

        let stats = Aggregator::statistics(&records);
        assert_eq!(stats.unique_cities, 2);
    }
}
