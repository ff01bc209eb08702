//! External API integrations

pub mod datagov;
pub mod llm;
pub mod newsdata;
pub mod places;
pub mod storage;
pub mod twilio;
pub mod weather;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

pub use datagov::{DataGovClient, MarketPriceSource};
pub use llm::{GeminiClient, InlineImage, LanguageModel, ModelRequest};
pub use newsdata::{NewsDataClient, NewsSource};
pub use places::{PlacesClient, SupplierSource};
pub use storage::{MediaFolder, MediaStorage};
pub use twilio::{Notifier, TwilioClient};
pub use weather::{WeatherClient, WeatherSource};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Handles to every outside service the backend talks to
#[derive(Clone)]
pub struct Integrations {
    /// None when no model API key is configured
    pub llm: Option<Arc<dyn LanguageModel>>,
    pub prices: Arc<dyn MarketPriceSource>,
    pub weather: Arc<dyn WeatherSource>,
    pub news: Arc<dyn NewsSource>,
    pub suppliers: Arc<dyn SupplierSource>,
    pub notifier: Arc<dyn Notifier>,
    pub storage: MediaStorage,
}

impl Integrations {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let llm = GeminiClient::from_config(&config.llm)?
            .map(|client| Arc::new(client) as Arc<dyn LanguageModel>);
        if llm.is_none() {
            tracing::warn!("No LLM API key configured, advisory endpoints will be unavailable");
        }

        let http = http_client(config.http.timeout_secs)?;

        Ok(Self {
            llm,
            prices: Arc::new(DataGovClient::new(http.clone(), &config.market)),
            weather: Arc::new(WeatherClient::new(http.clone(), &config.weather)),
            news: Arc::new(NewsDataClient::new(http.clone(), &config.news)),
            suppliers: Arc::new(PlacesClient::new(http.clone(), &config.places)),
            notifier: Arc::new(TwilioClient::new(http, &config.twilio)),
            storage: MediaStorage::new(&config.storage),
        })
    }

    /// The configured model, or an error the handlers surface as 503
    pub fn model(&self) -> AppResult<Arc<dyn LanguageModel>> {
        self.llm.clone().ok_or(AppError::AiUnavailable)
    }
}

/// HTTP client whose requests give up after `timeout_secs`
pub fn http_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
pub(crate) fn test_client() -> Client {
    http_client(5).expect("test HTTP client")
}
