//! In-memory time-to-live caches, one per data category.
//!
//! Expiry is lazy: a stale entry is reported as a miss on read but stays in
//! the map until the next `put` for the same key replaces it.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::types::{Forecast, Metrics, Moon, WeatherRecord, Wind};

/// A cached value and the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, ttl_hours: u32, now: DateTime<Utc>) -> bool {
        now - self.timestamp > Duration::hours(i64::from(ttl_hours))
    }
}

/// String-keyed cache with per-read TTL.
///
/// Keys are used verbatim: callers must normalise them consistently (see
/// [`crate::location::normalize_key`]) or lookups silently miss.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh copy of the value for `key`, or `None` if absent or older than `ttl_hours`.
    pub fn get(&self, key: &str, ttl_hours: u32) -> Option<T> {
        self.get_at(key, ttl_hours, Utc::now())
    }

    /// Like [`get`](Self::get) against an explicit clock.
    pub fn get_at(&self, key: &str, ttl_hours: u32, now: DateTime<Utc>) -> Option<T> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;

        if entry.is_expired(ttl_hours, now) {
            tracing::trace!(key, "cache entry expired");
            return None;
        }

        Some(entry.value.clone())
    }

    /// Insert or replace the entry for `key`, stamped with the current time.
    pub fn put(&self, key: impl Into<String>, value: T) {
        self.put_at(key, value, Utc::now());
    }

    pub fn put_at(&self, key: impl Into<String>, value: T, timestamp: DateTime<Utc>) {
        self.entries
            .lock()
            .insert(key.into(), CacheEntry { value, timestamp });
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-category caches. Each has its own key space and lock.
#[derive(Debug, Default)]
pub struct Caches {
    pub weather: TtlCache<WeatherRecord>,
    pub metrics: TtlCache<Metrics>,
    pub wind: TtlCache<Wind>,
    pub forecast: TtlCache<Forecast>,
    pub moon: TtlCache<Moon>,
}

impl Caches {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_put_then_get() {
        let cache = TtlCache::new();
        cache.put("ROME", 21);
        assert_eq!(cache.get("ROME", 1), Some(21));
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<i32> = TtlCache::new();
        assert_eq!(cache.get("ROME", 1), None);
    }

    #[test]
    fn test_keys_are_not_normalized() {
        let cache = TtlCache::new();
        cache.put("NEW_YORK", 1);
        assert_eq!(cache.get("new york", 1), None);
        assert_eq!(cache.get("NEW_YORK", 1), Some(1));
    }

    #[test]
    fn test_entry_at_exact_ttl_is_fresh() {
        let cache = TtlCache::new();
        cache.put_at("ROME", 21, at(8));
        assert_eq!(cache.get_at("ROME", 2, at(10)), Some(21));
    }

    #[test]
    fn test_expired_entry_is_a_miss_but_kept() {
        let cache = TtlCache::new();
        cache.put_at("ROME", 21, at(8));

        let later = at(10) + Duration::seconds(1);
        assert_eq!(cache.get_at("ROME", 2, later), None);
        assert_eq!(cache.len(), 1);

        // A later write shadows the stale entry
        cache.put_at("ROME", 25, later);
        assert_eq!(cache.get_at("ROME", 2, later), Some(25));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_ttl_is_per_read() {
        let cache = TtlCache::new();
        cache.put_at("ROME", 21, at(8));
        assert_eq!(cache.get_at("ROME", 1, at(12)), None);
        assert_eq!(cache.get_at("ROME", 6, at(12)), Some(21));
    }

    #[test]
    fn test_reads_are_deep_copies() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let cache = TtlCache::new();
        cache.put(
            "ROME",
            Forecast {
                forecast: vec![crate::types::ForecastDay {
                    date: day,
                    min: 10.0,
                    max: 20.0,
                    condition: "Clear".to_string(),
                    emoji: "☀️".to_string(),
                    feels_like: 19.0,
                    wind: Wind {
                        arrow: "⬇️".to_string(),
                        direction: "N".to_string(),
                        speed: 10.0,
                    },
                }],
            },
        );

        let mut first = cache.get("ROME", 1).unwrap();
        first.forecast[0].max = 68.0;
        first.forecast[0].wind.speed = 6.2;
        first.forecast.clear();

        let second = cache.get("ROME", 1).unwrap();
        assert_eq!(second.forecast.len(), 1);
        assert_eq!(second.forecast[0].max, 20.0);
        assert_eq!(second.forecast[0].wind.speed, 10.0);
    }

    #[test]
    fn test_categories_do_not_share_keys() {
        let caches = Caches::new();
        caches.moon.put(
            "ROME",
            Moon {
                icon: "🌕".to_string(),
                phase: "Full Moon".to_string(),
                percentage: 100,
            },
        );

        assert!(caches.moon.get("ROME", 1).is_some());
        assert!(caches.weather.get("ROME", 1).is_none());
        assert!(caches.forecast.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = std::sync::Arc::new(TtlCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        cache.put(format!("K{}", j % 10), i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 10);
    }
}
