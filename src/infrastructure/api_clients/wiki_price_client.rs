use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::domain::catalog::MappingEntry;
use crate::domain::price::{PriceFeed, PriceTable};
use crate::shared::errors::FeedError;
use crate::shared::types::ApiConfig;

/// Client for the OSRS Wiki real-time prices API
pub struct WikiPriceClient {
    http_client: Client,
    mapping_url: String,
    latest_url: String,
}

impl WikiPriceClient {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(http_client, config))
    }

    /// Use a preconfigured reqwest client. Only the URLs are taken from `config`.
    pub fn with_client(http_client: Client, config: &ApiConfig) -> Self {
        Self {
            http_client,
            mapping_url: config.mapping_url.clone(),
            latest_url: config.latest_url.clone(),
        }
    }

    async fn get_body(&self, url: &str) -> Result<String, FeedError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Network { url: url.to_string(), source })?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| FeedError::Network { url: url.to_string(), source })
    }
}

#[async_trait]
impl PriceFeed for WikiPriceClient {
    async fn fetch_mapping(&self) -> Result<Vec<MappingEntry>, FeedError> {
        let body = self.get_body(&self.mapping_url).await?;
        let entries: Vec<MappingEntry> = serde_json::from_str(&body).map_err(|e| FeedError::Decode {
            url: self.mapping_url.clone(),
            message: e.to_string(),
        })?;

        info!("Fetched {} item mappings", entries.len());
        Ok(entries)
    }

    async fn fetch_latest(&self) -> Result<PriceTable, FeedError> {
        let body = self.get_body(&self.latest_url).await?;
        let table = PriceTable::from_json(&body).map_err(|e| FeedError::Decode {
            url: self.latest_url.clone(),
            message: e.to_string(),
        })?;

        debug!("Fetched latest prices for {} items", table.len());
        Ok(table)
    }
}
