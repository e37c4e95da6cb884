//! Weather collaborator interface.
//!
//! The HTTP client lives outside the core; this module defines what it must
//! return and how the configured city is chosen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BoxFuture;
use crate::settings::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl WeatherUnit {
    /// Convert a Celsius reading into this unit.
    pub fn convert_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Current conditions for one city. Temperatures are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temp: f64,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    /// Wind speed in km/h.
    pub wind: f64,
    pub city: String,
}

impl WeatherData {
    /// Temperature rounded for display in `unit`, e.g. `"23°C"`.
    pub fn display_temp(&self, unit: WeatherUnit) -> String {
        format!("{:.0}{}", unit.convert_celsius(self.temp), unit.symbol())
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("No city configured and location detection failed")]
    NoLocation,
    #[error("Weather service error: {0}")]
    Service(String),
}

/// Source of weather data (HTTP API, fixture, ...).
pub trait WeatherProvider {
    /// Current weather for a named city.
    fn fetch(&self, city: &str) -> BoxFuture<'_, Result<WeatherData, WeatherError>>;

    /// Best-effort city detection (IP or geolocation).
    fn detect_city(&self) -> BoxFuture<'_, Result<Option<String>, WeatherError>>;
}

/// Fetch weather for the configured city, falling back to detection when the
/// setting is blank.
pub async fn current_weather<P: WeatherProvider + ?Sized>(
    provider: &P,
    settings: &AppSettings,
) -> Result<WeatherData, WeatherError> {
    let configured = settings.weather_city.trim();
    if !configured.is_empty() {
        return provider.fetch(configured).await;
    }
    let city = provider
        .detect_city()
        .await?
        .ok_or(WeatherError::NoLocation)?;
    log::debug!("Detected weather city: {}", city);
    provider.fetch(&city).await
}
