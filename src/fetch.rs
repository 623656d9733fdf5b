//! Descriptor retrieval from the generation backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::descriptor::{ModelDescriptor, WorldDescriptor};
use crate::error::FetchError;

/// Retrieves raw asset descriptors by ID.
///
/// Implementations perform a single attempt with no retry of their own;
/// retry is the engine's job.
#[async_trait]
pub trait DescriptorFetcher: Send + Sync {
    async fn fetch_model(&self, id: &str) -> Result<ModelDescriptor, FetchError>;
    async fn fetch_world(&self, id: &str) -> Result<WorldDescriptor, FetchError>;
}

/// Stock fetcher: one GET + JSON decode per descriptor.
pub struct HttpDescriptorFetcher {
    client: Client,
    base_url: String,
}

impl HttpDescriptorFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("fetching descriptor from {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DescriptorFetcher for HttpDescriptorFetcher {
    async fn fetch_model(&self, id: &str) -> Result<ModelDescriptor, FetchError> {
        self.get_json(&format!("/v1/models/{}", id)).await
    }

    async fn fetch_world(&self, id: &str) -> Result<WorldDescriptor, FetchError> {
        self.get_json(&format!("/v1/worlds/{}", id)).await
    }
}
