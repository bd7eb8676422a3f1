use crate::{CurrentConditions, Location, WeatherError};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Turns a free-text city name into a single best-match coordinate pair.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Checked by the controller before any lookup is attempted.
    fn ensure_configured(&self) -> Result<(), WeatherError> {
        Ok(())
    }

    /// `Ok(None)` when the provider has no match for `city`.
    async fn resolve(&self, city: &str) -> Result<Option<Location>, WeatherError>;
}

/// Turns a coordinate pair into current conditions, metric units.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    fn ensure_configured(&self) -> Result<(), WeatherError> {
        Ok(())
    }

    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError>;
}
