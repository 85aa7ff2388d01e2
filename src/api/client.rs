//! reqwest-backed backend client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::models::{Envelope, HeartBeat, HistoryQuery, Monitor, MonitorStats};
use super::ApiError;
use crate::history::Sample;
use crate::poller::HistorySource;

/// HTTP client for the status backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch an endpoint and unwrap its envelope.
    ///
    /// Returns `Ok(None)` when the backend answers with `success: false` or
    /// without a payload.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        if !envelope.success {
            tracing::debug!(
                "Backend returned no data for {}: {}",
                url,
                envelope.error.as_deref().unwrap_or("unknown error")
            );
        }

        Ok(envelope.into_data())
    }

    pub async fn monitors(&self) -> Result<Option<Vec<Monitor>>, ApiError> {
        self.get("/api/monitors", &[]).await
    }

    pub async fn monitor(&self, id: i64) -> Result<Option<Monitor>, ApiError> {
        self.get(&format!("/api/monitors/{}", id), &[]).await
    }

    pub async fn stats(&self) -> Result<Option<MonitorStats>, ApiError> {
        self.get("/api/stats", &[]).await
    }

    /// Fetch heartbeat history as samples.
    ///
    /// Heartbeats without a usable timestamp are skipped.
    pub async fn history(
        &self,
        id: i64,
        query: HistoryQuery,
    ) -> Result<Option<Vec<Sample>>, ApiError> {
        let heartbeats: Option<Vec<HeartBeat>> = self
            .get(&format!("/api/monitors/{}/history", id), &[query.param()])
            .await?;

        Ok(heartbeats.map(|hbs| {
            hbs.iter()
                .filter_map(|hb| {
                    let sample = hb.to_sample();
                    if sample.is_none() {
                        tracing::warn!(
                            "Skipping heartbeat {} for monitor {}: bad timestamp {:?}",
                            hb.id,
                            id,
                            hb.created_at
                        );
                    }
                    sample
                })
                .collect()
        }))
    }
}

#[async_trait]
impl HistorySource for ApiClient {
    async fn monitors(&self) -> Result<Option<Vec<Monitor>>, ApiError> {
        ApiClient::monitors(self).await
    }

    async fn monitor(&self, id: i64) -> Result<Option<Monitor>, ApiError> {
        ApiClient::monitor(self, id).await
    }

    async fn stats(&self) -> Result<Option<MonitorStats>, ApiError> {
        ApiClient::stats(self).await
    }

    async fn history(
        &self,
        id: i64,
        query: HistoryQuery,
    ) -> Result<Option<Vec<Sample>>, ApiError> {
        ApiClient::history(self, id, query).await
    }
}
