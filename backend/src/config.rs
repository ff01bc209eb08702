//! Configuration management for the Krishak Mitra platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KM_ prefix
//!
//! An empty API key or credential means the integration is not configured.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Outbound HTTP settings shared by the external API clients
    #[serde(default)]
    pub http: HttpConfig,

    /// Generative model configuration
    pub llm: LlmConfig,

    /// Weather and geocoding API configuration
    pub weather: WeatherConfig,

    /// Mandi price API configuration
    pub market: MarketConfig,

    /// News search API configuration
    pub news: NewsConfig,

    /// Places search API configuration
    pub places: PlacesConfig,

    /// Twilio messaging configuration
    pub twilio: TwilioConfig,

    /// Uploaded media storage
    pub storage: StorageConfig,

    /// Price alert polling
    pub alerts: AlertsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout in seconds for weather, market, news, places and Twilio calls
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Gemini API key
    pub api_key: String,

    /// Model name, e.g. gemini-1.5-flash
    pub model: String,

    /// Generative Language API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint
    pub forecast_url: String,

    /// Geocoding endpoint
    pub geocoding_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// data.gov.in API key
    pub api_key: String,

    /// Daily commodity price resource URL
    pub resource_url: String,

    /// Records requested per lookup
    pub record_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    /// newsdata.io API key
    pub api_key: String,

    /// News search endpoint
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlacesConfig {
    /// Google Places API key
    pub api_key: String,

    /// Text search endpoint
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TwilioConfig {
    /// Account SID
    pub account_sid: String,

    /// Auth token
    pub auth_token: String,

    /// WhatsApp-enabled sender number, e.g. +14155238886
    pub from_number: String,

    /// REST API base URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory uploaded media is written to
    pub media_dir: String,

    /// Public URL prefix the media directory is served under
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    /// Seconds between background price checks, 0 disables the poller
    pub check_interval_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("KM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("http.timeout_secs", 15)?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "gemini-1.5-flash")?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("llm.timeout_secs", 120)?
            .set_default("weather.forecast_url", "https://api.open-meteo.com/v1/forecast")?
            .set_default(
                "weather.geocoding_url",
                "https://geocoding-api.open-meteo.com/v1/search",
            )?
            .set_default("market.api_key", "")?
            .set_default(
                "market.resource_url",
                "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070",
            )?
            .set_default("market.record_limit", 10)?
            .set_default("news.api_key", "")?
            .set_default("news.api_url", "https://newsdata.io/api/1/news")?
            .set_default("places.api_key", "")?
            .set_default(
                "places.api_url",
                "https://places.googleapis.com/v1/places:searchText",
            )?
            .set_default("twilio.account_sid", "")?
            .set_default("twilio.auth_token", "")?
            .set_default("twilio.from_number", "")?
            .set_default("twilio.base_url", "https://api.twilio.com")?
            .set_default("storage.media_dir", "./media")?
            .set_default("storage.public_base_url", "http://localhost:3000/media")?
            .set_default("alerts.check_interval_secs", 3600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KM_ prefix)
            .add_source(
                Environment::with_prefix("KM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
