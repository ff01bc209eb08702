//! Google Places text search for nearby agricultural suppliers

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::PlacesConfig;
use crate::error::{AppError, AppResult};
use shared::Supplier;

const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.nationalPhoneNumber";
const MAX_RESULTS: u32 = 10;

/// Finds agri-input shops near a location. Returns an empty list on failure.
#[async_trait]
pub trait SupplierSource: Send + Sync {
    async fn nearby_suppliers(&self, location: &str) -> Vec<Supplier>;
}

#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    text_query: String,
    language_code: &'a str,
    max_result_count: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    display_name: Option<DisplayName>,
    formatted_address: Option<String>,
    national_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DisplayName {
    text: String,
}

impl PlacesClient {
    pub fn new(client: Client, config: &PlacesConfig) -> Self {
        Self::with_base_url(client, config.api_key.clone(), config.api_url.clone())
    }

    pub fn with_base_url(client: Client, api_key: String, api_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url,
        }
    }

    async fn search(&self, location: &str) -> AppResult<Vec<Supplier>> {
        let request = SearchRequest {
            text_query: format!(
                "Krishi Seva Kendra OR agricultural supply OR fertilizer shop OR pesticide shop OR seed supplier in {}",
                location
            ),
            language_code: "en",
            max_result_count: MAX_RESULTS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Places request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Places API error: {} - {}",
                status, body
            )));
        }

        let data: SearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse places response: {}", e))
        })?;

        Ok(unique_suppliers(data.places))
    }
}

/// Drops places without a name or address and repeats of the same name at the same address
fn unique_suppliers(places: Vec<Place>) -> Vec<Supplier> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter_map(|p| {
            let name = p.display_name.map(|d| d.text).filter(|n| !n.is_empty())?;
            let address = p.formatted_address.filter(|a| !a.is_empty())?;
            seen.insert((name.clone(), address.clone())).then_some(Supplier {
                name,
                address,
                phone: p.national_phone_number,
            })
        })
        .collect()
}

#[async_trait]
impl SupplierSource for PlacesClient {
    async fn nearby_suppliers(&self, location: &str) -> Vec<Supplier> {
        if self.api_key.trim().is_empty() {
            tracing::warn!("Places API key not set, returning placeholder supplier");
            return vec![Supplier {
                name: "Mock Krishi Kendra".to_string(),
                address: "123 Mock Street, Mockville".to_string(),
                phone: Some("9876543210".to_string()),
            }];
        }

        self.search(location).await.unwrap_or_else(|e| {
            tracing::error!("Supplier search near '{}' failed: {}", location, e);
            Vec::new()
        })
    }
}
