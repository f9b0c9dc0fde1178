//! Per-location temperature statistics built on the historical store.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::error::StatsError;
use crate::history::HistoricalStore;
use crate::statistics;
use crate::types::{StatResult, WeatherAnomaly, WeatherRecord};

/// Summarises a location's stored history.
#[derive(Debug, Clone)]
pub struct StatisticsService {
    store: Arc<HistoricalStore>,
}

impl StatisticsService {
    pub fn new(store: Arc<HistoricalStore>) -> Self {
        Self { store }
    }

    /// Statistics and anomalies over every stored record of `location_key`.
    ///
    /// # Errors
    /// [`StatsError::InsufficientData`] when fewer than two recent records exist,
    /// [`StatsError::InvalidRecord`] when a stored temperature is not a finite number.
    pub fn summarize(&self, location_key: &str) -> Result<StatResult, StatsError> {
        self.summarize_on(location_key, Utc::now().date_naive())
    }

    /// Like [`summarize`](Self::summarize) with an explicit current day.
    pub fn summarize_on(
        &self,
        location_key: &str,
        today: NaiveDate,
    ) -> Result<StatResult, StatsError> {
        if self.store.is_insufficient_on(location_key, today) {
            return Err(StatsError::InsufficientData(location_key.to_string()));
        }

        // The recency gate only looks at the last two days; the summary uses
        // the full history of the location.
        let records = self.store.records_for(location_key);
        let temps = temperatures(&records)?;

        let anomalies = detect_anomalies(&records, &temps);

        let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(StatResult {
            count: records.len(),
            min,
            max,
            mean: statistics::mean(&temps),
            std_dev: statistics::std_dev(&temps),
            median: statistics::median(&temps),
            mode: statistics::mode(&temps),
            anomalies,
        })
    }
}

fn temperatures(records: &[WeatherRecord]) -> Result<Vec<f64>, StatsError> {
    records
        .iter()
        .map(|record| {
            if record.temperature.is_finite() {
                Ok(record.temperature)
            } else {
                Err(StatsError::InvalidRecord {
                    date: record.date,
                    temperature: record.temperature,
                })
            }
        })
        .collect()
}

/// Map robust z-score outliers back to the records they came from.
fn detect_anomalies(records: &[WeatherRecord], temps: &[f64]) -> Vec<WeatherAnomaly> {
    statistics::robust_z_score(temps)
        .into_iter()
        .map(|anomaly| WeatherAnomaly {
            date: records[anomaly.index].date,
            temperature: anomaly.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()
    }

    fn record(days_ago: i64, temperature: f64) -> WeatherRecord {
        WeatherRecord {
            date: today() - Duration::days(days_ago),
            temperature,
            feels_like: temperature,
            condition: "Clear".to_string(),
            emoji: "☀️".to_string(),
        }
    }

    fn service_with(records: &[(i64, f64)]) -> StatisticsService {
        let store = Arc::new(HistoricalStore::new());
        for &(days_ago, temp) in records {
            store.add("ROME", record(days_ago, temp));
        }
        StatisticsService::new(store)
    }

    #[test]
    fn test_single_record_is_insufficient() {
        let service = service_with(&[(0, 20.0)]);
        assert_eq!(
            service.summarize_on("ROME", today()),
            Err(StatsError::InsufficientData("ROME".to_string()))
        );
    }

    #[test]
    fn test_unknown_location_is_insufficient() {
        let service = service_with(&[(0, 20.0), (1, 21.0)]);
        assert!(matches!(
            service.summarize_on("PARIS", today()),
            Err(StatsError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_summary_of_two_records() {
        let service = service_with(&[(0, 20.0), (1, 24.0)]);
        let result = service.summarize_on("ROME", today()).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.min, 20.0);
        assert_eq!(result.max, 24.0);
        assert_eq!(result.mean, 22.0);
        assert_eq!(result.std_dev, 2.0);
        assert_eq!(result.median, 22.0);
        assert_eq!(result.mode, 24.0);
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_count_includes_old_records() {
        let service = service_with(&[(0, 20.0), (1, 21.0), (10, 19.0), (30, 18.0)]);
        let result = service.summarize_on("ROME", today()).unwrap();

        assert_eq!(result.count, 4);
        assert_eq!(result.min, 18.0);
    }

    #[test]
    fn test_anomaly_reports_record_date() {
        let normal = [
            18.0, 19.0, 19.0, 20.0, 20.0, 20.0, 21.0, 21.0, 21.0, 21.0, 22.0, 22.0, 22.0, 22.0,
            22.0, 23.0, 23.0, 23.0, 24.0, 24.0,
        ];
        let mut history: Vec<(i64, f64)> = normal
            .iter()
            .enumerate()
            .map(|(i, &t)| (i as i64 + 1, t))
            .collect();
        history.push((0, 31.0));

        let service = service_with(&history);
        let result = service.summarize_on("ROME", today()).unwrap();

        assert_eq!(result.count, 21);
        assert_eq!(
            result.anomalies,
            vec![WeatherAnomaly {
                date: today(),
                temperature: 31.0
            }]
        );
    }

    #[test]
    fn test_non_finite_temperature_aborts() {
        let service = service_with(&[(0, 20.0), (1, f64::NAN), (2, 22.0)]);
        let err = service.summarize_on("ROME", today()).unwrap_err();

        match err {
            StatsError::InvalidRecord { date, temperature } => {
                assert_eq!(date, today() - Duration::days(1));
                assert!(temperature.is_nan());
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }
}
