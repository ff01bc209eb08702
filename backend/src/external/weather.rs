//! Weather API client for short-range forecasts
//!
//! Integrates with Open-Meteo: the geocoding API resolves a free-form
//! location, the forecast API returns daily aggregates for three days.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};
use shared::{weather_code_description, DailyForecast};

const DAY_LABELS: [&str; 3] = ["Today", "Tomorrow", "Day after tomorrow"];

/// Source of three day forecasts. Never fails: callers get placeholder data
/// when the location cannot be resolved or the API is down.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn forecast(&self, location: &str) -> Vec<DailyForecast>;
}

/// Open-Meteo API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    forecast_url: String,
    geocoding_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

/// Column-oriented daily data; entries can be null for missing readings
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<Option<i32>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<Option<f64>>,
}

impl WeatherClient {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self::with_base_url(client, config.forecast_url.clone(), config.geocoding_url.clone())
    }

    /// Create a client with custom endpoints (for testing)
    pub fn with_base_url(client: Client, forecast_url: String, geocoding_url: String) -> Self {
        Self {
            client,
            forecast_url,
            geocoding_url,
        }
    }

    /// Resolve a location name to coordinates
    pub async fn geocode(&self, location: &str) -> AppResult<Option<(f64, f64)>> {
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", location), ("count", "1")])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Geocoding API error: {} - {}",
                status, body
            )));
        }

        let data: GeocodingResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse geocoding response: {}", e))
        })?;

        Ok(data.results.first().map(|r| (r.latitude, r.longitude)))
    }

    /// Fetch the three day daily forecast for coordinates
    pub async fn get_forecast(&self, latitude: f64, longitude: f64) -> AppResult<Vec<DailyForecast>> {
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "daily",
                    "weather_code,temperature_2m_max,precipitation_probability_max,relative_humidity_2m_mean"
                        .to_string(),
                ),
                ("forecast_days", "3".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: ForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse forecast response: {}", e))
        })?;

        Ok(convert_daily(data.daily))
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn forecast(&self, location: &str) -> Vec<DailyForecast> {
        let coords = match self.geocode(location).await {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                tracing::warn!("Could not geocode '{}', using placeholder forecast", location);
                return placeholder_forecast("Mock");
            }
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", location, e);
                return placeholder_forecast("Mock");
            }
        };

        match self.get_forecast(coords.0, coords.1).await {
            Ok(days) => days,
            Err(e) => {
                tracing::error!("Failed to fetch forecast for '{}': {}", location, e);
                placeholder_forecast("API Error")
            }
        }
    }
}

fn convert_daily(daily: DailyBlock) -> Vec<DailyForecast> {
    let value = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten().unwrap_or(0.0);

    daily
        .time
        .iter()
        .take(DAY_LABELS.len())
        .enumerate()
        .map(|(i, _)| DailyForecast {
            day: DAY_LABELS[i].to_string(),
            temp: value(&daily.temperature_2m_max, i).round() as i32,
            condition: weather_code_description(
                daily.weather_code.get(i).copied().flatten().unwrap_or(-1),
            )
            .to_string(),
            rain_probability: value(&daily.precipitation_probability_max, i).round() as i32,
            humidity: value(&daily.relative_humidity_2m_mean, i).round() as i32,
        })
        .collect()
}

/// Plausible monsoon-season forecast, tagged so it is never mistaken for real data
fn placeholder_forecast(tag: &str) -> Vec<DailyForecast> {
    [(28, "Sunny", 10, 80), (29, "Partly Cloudy", 20, 85), (27, "Light Rain", 60, 90)]
        .iter()
        .zip(DAY_LABELS)
        .map(|((temp, condition, rain, humidity), day)| DailyForecast {
            day: day.to_string(),
            temp: *temp,
            condition: format!("{} ({})", condition, tag),
            rain_probability: *rain,
            humidity: *humidity,
        })
        .collect()
}
