//! newsdata.io client for agricultural market news

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::NewsConfig;
use crate::error::{AppError, AppResult};
use shared::NewsItem;

const MAX_ARTICLES: usize = 5;

/// Source of recent news headlines. Falls back to a placeholder item on failure.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self, query: &str) -> Vec<NewsItem>;
}

#[derive(Clone)]
pub struct NewsDataClient {
    client: Client,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: String,
    description: Option<String>,
    content: Option<String>,
    #[serde(default)]
    link: String,
}

impl NewsDataClient {
    pub fn new(client: Client, config: &NewsConfig) -> Self {
        Self::with_base_url(client, config.api_key.clone(), config.api_url.clone())
    }

    pub fn with_base_url(client: Client, api_key: String, api_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url,
        }
    }

    async fn fetch(&self, query: &str) -> AppResult<Vec<NewsItem>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", query),
                ("language", "en"),
                ("country", "in"),
                ("category", "business,science,technology"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("News request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "newsdata.io API error: {} - {}",
                status, body
            )));
        }

        let data: NewsResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse news response: {}", e))
        })?;

        Ok(data
            .results
            .into_iter()
            .take(MAX_ARTICLES)
            .map(|a| NewsItem {
                title: a.title,
                summary: a
                    .description
                    .filter(|d| !d.is_empty())
                    .or(a.content)
                    .unwrap_or_default(),
                link: a.link,
            })
            .collect())
    }
}

#[async_trait]
impl NewsSource for NewsDataClient {
    async fn headlines(&self, query: &str) -> Vec<NewsItem> {
        if self.api_key.trim().is_empty() {
            tracing::warn!("newsdata.io API key not set, returning placeholder news");
            return vec![NewsItem {
                title: "Mock News: Govt. increases MSP for Wheat".to_string(),
                summary: "Placeholder summary, no news API key configured.".to_string(),
                link: "#".to_string(),
            }];
        }

        match self.fetch(query).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Failed to fetch news for '{}': {}", query, e);
                vec![NewsItem {
                    title: "Mock News on API Error".to_string(),
                    summary: "Placeholder summary, the news API request failed.".to_string(),
                    link: "#".to_string(),
                }]
            }
        }
    }
}
