//! data.gov.in client for daily mandi prices

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::MarketConfig;
use crate::error::{AppError, AppResult};
use shared::{MandiPrice, MarketPrices};

/// Source of current modal prices for a crop in a district
#[async_trait]
pub trait MarketPriceSource: Send + Sync {
    async fn mandi_prices(&self, state: &str, district: &str, commodity: &str)
        -> AppResult<MarketPrices>;
}

#[derive(Clone)]
pub struct DataGovClient {
    client: Client,
    api_key: String,
    resource_url: String,
    record_limit: u32,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    records: Vec<PriceRecord>,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(default)]
    market: String,
    /// Reported as a string by the API, occasionally as a number
    #[serde(default)]
    modal_price: serde_json::Value,
}

impl DataGovClient {
    pub fn new(client: Client, config: &MarketConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            resource_url: config.resource_url.clone(),
            record_limit: config.record_limit,
        }
    }

    /// Create a client with a custom resource URL (for testing)
    pub fn with_base_url(client: Client, api_key: String, resource_url: String) -> Self {
        Self {
            client,
            api_key,
            resource_url,
            record_limit: 10,
        }
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl MarketPriceSource for DataGovClient {
    async fn mandi_prices(
        &self,
        state: &str,
        district: &str,
        commodity: &str,
    ) -> AppResult<MarketPrices> {
        if !self.is_configured() {
            tracing::warn!("data.gov.in API key not set, returning placeholder prices");
            return Ok(placeholder_prices(district));
        }

        let response = self
            .client
            .get(&self.resource_url)
            .query(&[
                ("api-key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", &self.record_limit.to_string()),
                ("filters[state]", state),
                ("filters[district]", district),
                ("filters[commodity]", commodity),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mandi price request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "data.gov.in API error: {} - {}",
                status, body
            )));
        }

        let data: PriceResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse mandi price response: {}", e))
        })?;

        let records: Vec<MandiPrice> = data
            .records
            .into_iter()
            .filter_map(|record| {
                let price = parse_price(&record.modal_price)?;
                Some(MandiPrice {
                    market: record.market,
                    price,
                })
            })
            .collect();

        if records.is_empty() {
            tracing::info!(
                "No mandi prices for {} in {}, {}; returning placeholder prices",
                commodity,
                district,
                state
            );
            return Ok(placeholder_prices(district));
        }

        Ok(MarketPrices::live(records))
    }
}

fn parse_price(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn placeholder_prices(district: &str) -> MarketPrices {
    MarketPrices::mock(vec![
        MandiPrice {
            market: format!("Mock Market 1, {}", district),
            price: Decimal::from(2150),
        },
        MandiPrice {
            market: format!("Mock Market 2, {}", district),
            price: Decimal::from(2050),
        },
    ])
}
