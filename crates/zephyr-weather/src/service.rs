//! Fetch-through-cache access to the provider.
//!
//! Every category has its own cache. A fresh current-weather fetch is also
//! recorded in the history store, which feeds [`StatisticsService`].

use std::future::Future;
use std::sync::Arc;

use crate::cache::{Caches, TtlCache};
use crate::error::ProviderError;
use crate::history::HistoricalStore;
use crate::location::normalize_key;
use crate::provider::WeatherProvider;
use crate::stats::StatisticsService;
use crate::types::{City, Forecast, Metrics, Moon, WeatherRecord, Wind};

/// Cache key for moon data, which does not depend on location.
const MOON_KEY: &str = "MOON";

pub struct WeatherService {
    provider: WeatherProvider,
    caches: Arc<Caches>,
    history: Arc<HistoricalStore>,
    ttl_hours: u32,
}

impl WeatherService {
    pub fn new(
        provider: WeatherProvider,
        caches: Arc<Caches>,
        history: Arc<HistoricalStore>,
        ttl_hours: u32,
    ) -> Self {
        Self {
            provider,
            caches,
            history,
            ttl_hours,
        }
    }

    /// Current weather for `location`; a fresh fetch is also added to the history.
    pub async fn current(&self, location: &str) -> Result<WeatherRecord, ProviderError> {
        let key = normalize_key(location);

        if let Some(hit) = self.caches.weather.get(&key, self.ttl_hours) {
            tracing::debug!(%key, "current weather served from cache");
            return Ok(hit);
        }

        let city = self.provider.geocode(location).await?;
        let record = self.provider.current(&city).await?;

        self.caches.weather.put(key.clone(), record.clone());
        self.history.add(&key, record.clone());

        Ok(record)
    }

    pub async fn metrics(&self, location: &str) -> Result<Metrics, ProviderError> {
        self.located(&self.caches.metrics, location, |city| async move {
            self.provider.metrics(&city).await
        })
        .await
    }

    pub async fn wind(&self, location: &str) -> Result<Wind, ProviderError> {
        self.located(&self.caches.wind, location, |city| async move {
            self.provider.wind(&city).await
        })
        .await
    }

    pub async fn forecast(&self, location: &str) -> Result<Forecast, ProviderError> {
        self.located(&self.caches.forecast, location, |city| async move {
            self.provider.forecast(&city).await
        })
        .await
    }

    pub async fn moon(&self) -> Result<Moon, ProviderError> {
        if let Some(hit) = self.caches.moon.get(MOON_KEY, self.ttl_hours) {
            return Ok(hit);
        }

        let moon = self.provider.moon().await?;
        self.caches.moon.put(MOON_KEY, moon.clone());
        Ok(moon)
    }

    /// Statistics over the history this service has been recording.
    pub fn statistics(&self) -> StatisticsService {
        StatisticsService::new(self.history.clone())
    }

    /// Serve from `cache`, or geocode `location`, fetch and store.
    async fn located<T, F, Fut>(
        &self,
        cache: &TtlCache<T>,
        location: &str,
        fetch: F,
    ) -> Result<T, ProviderError>
    where
        T: Clone,
        F: FnOnce(City) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let key = normalize_key(location);

        if let Some(hit) = cache.get(&key, self.ttl_hours) {
            tracing::debug!(%key, "served from cache");
            return Ok(hit);
        }

        let city = self.provider.geocode(location).await?;
        let value = fetch(city).await?;
        cache.put(key, value.clone());

        Ok(value)
    }
}
