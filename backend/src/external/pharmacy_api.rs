//! Client for the pharmacy REST API
//!
//! Fetches product and batch snapshots. This is the only place the alerts
//! server talks to the network; the alert engine consumes what it returns.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use shared::Snapshot;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Pharmacy API client
#[derive(Clone)]
pub struct PharmacyApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Listing payload: either a bare array or wrapped in `{ "data": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) => items,
            Listing::Wrapped { data } => data,
        }
    }
}

impl PharmacyApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Fetch products and batches concurrently. Records are decoded one by
    /// one; unreadable batches come back as issues, unreadable products are
    /// dropped.
    pub async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        let (products, batches) =
            tokio::try_join!(self.get_listing("products"), self.get_listing("batches"))?;
        Ok(Snapshot::from_records(products, batches))
    }

    /// Check that the API answers at all
    pub async fn ping(&self) -> bool {
        self.request("products")
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// GET on a resource, authenticated when a service token is configured
    fn request(&self, resource: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}/{}", self.base_url, resource));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_listing(&self, resource: &str) -> AppResult<Vec<Value>> {
        let response = self.request(resource).send().await.map_err(|e| {
            tracing::warn!(resource, error = %e, "Pharmacy API request failed");
            AppError::ApiUnavailable(format!("{} request failed: {}", resource, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Pharmacy API error on {}: {} - {}",
                resource, status, body
            )));
        }

        let listing: Listing<Value> = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse {} response: {}", resource, e))
        })?;

        let items = listing.into_vec();
        tracing::debug!(resource, count = items.len(), "Fetched listing");
        Ok(items)
    }
}
