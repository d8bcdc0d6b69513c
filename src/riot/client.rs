use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use super::metrics::RequestMetrics;
use super::region::{Platform, Region};
use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rate limited HTTP client for the Riot REST API.
#[derive(Clone, Debug)]
pub struct RiotClient {
    http: reqwest::Client,
    api_key: String,
    limiter: Arc<DefaultDirectRateLimiter>,
    metrics: Arc<RequestMetrics>,
    /// Replaces every routing host, used to point the client at a local server.
    base_url_override: Option<String>,
}

impl RiotClient {
    pub fn new(api_key: String, requests_per_second: NonZeroU32) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second))),
            metrics: RequestMetrics::new(),
            base_url_override: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn metrics(&self) -> Arc<RequestMetrics> {
        self.metrics.clone()
    }

    pub(crate) fn platform_url(&self, platform: Platform) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| platform.base_url())
    }

    pub(crate) fn region_url(&self, region: Region) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| region.base_url())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.limiter.until_ready().await;
        self.metrics.inc();

        trace!(url, "🛰️ GET");

        let res = self
            .http
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            self.metrics.record_failure();
            let message = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url, "🛰️ ⚠️ Riot API returned an error");
            return Err(AppError::RiotApi {
                status: status.as_u16(),
                message,
            });
        }

        Ok(res.json().await?)
    }
}
