//! Append-only history of daily current-weather records, one per location and day.

use chrono::{Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::types::WeatherRecord;

/// Records younger than this many days count towards sufficiency.
pub const RECENT_WINDOW_DAYS: i64 = 2;
/// Recent records needed before statistics are meaningful.
pub const MIN_RECENT_RECORDS: usize = 2;

/// In-memory `"YYYY-MM-DD@LOCATION" -> WeatherRecord` map.
///
/// The first record stored for a (day, location) pair is kept; later fetches
/// for the same day never overwrite it.
///
/// Lookups match any composite key ending with the location key, so `ROME`
/// also picks up records stored under `NEW_ROME`.
#[derive(Debug, Default)]
pub struct HistoricalStore {
    records: Mutex<HashMap<String, WeatherRecord>>,
}

fn composite_key(date: NaiveDate, location_key: &str) -> String {
    format!("{}@{}", date.format("%Y-%m-%d"), location_key)
}

impl HistoricalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` unless one already exists for its day and location.
    ///
    /// Returns `true` if the record was inserted.
    pub fn add(&self, location_key: &str, record: WeatherRecord) -> bool {
        let key = composite_key(record.date, location_key);
        let mut records = self.records.lock();

        if records.contains_key(&key) {
            tracing::trace!(%key, "history already has a record for this day");
            return false;
        }

        tracing::debug!(%key, temperature = record.temperature, "recording daily weather");
        records.insert(key, record);
        true
    }

    /// True unless the location has at least [`MIN_RECENT_RECORDS`] records
    /// dated within the last [`RECENT_WINDOW_DAYS`] days.
    pub fn is_insufficient(&self, location_key: &str) -> bool {
        self.is_insufficient_on(location_key, Utc::now().date_naive())
    }

    /// Like [`is_insufficient`](Self::is_insufficient) with an explicit current day.
    pub fn is_insufficient_on(&self, location_key: &str, today: NaiveDate) -> bool {
        let threshold = today - Duration::days(RECENT_WINDOW_DAYS);

        let recent = self
            .records
            .lock()
            .iter()
            .filter(|(key, record)| key.ends_with(location_key) && record.date >= threshold)
            .take(MIN_RECENT_RECORDS)
            .count();

        recent < MIN_RECENT_RECORDS
    }

    /// Every stored record for the location, regardless of age. Order is unspecified.
    pub fn records_for(&self, location_key: &str) -> Vec<WeatherRecord> {
        self.records
            .lock()
            .iter()
            .filter(|(key, _)| key.ends_with(location_key))
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Total number of records across all locations.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
