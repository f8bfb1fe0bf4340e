use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, path::Path};
use tokio::task::JoinHandle;

use crate::{
    cache::ResponseCache,
    config::{Config, DEFAULT_API_KEY, DEFAULT_ENDPOINT},
    decode::decode_response,
    error::WeatherError,
    model::{Coordinate, WeatherQueryResult},
};

/// Number of stations requested per fetch.
pub const RESULT_LIMIT: u32 = 15;

/// What a UI needs from the weather core: a fresh fetch and an immediate cached fallback.
///
/// Neither method reports why data is missing; `None` covers every failure.
#[async_trait]
pub trait ObservationSource: Send + Sync + Debug {
    /// One network round-trip for stations near `near`.
    async fn fetch_observations(&self, near: Coordinate) -> Option<WeatherQueryResult>;

    /// The last successful response, decoded. Never touches the network.
    fn cached_observations(&self) -> Option<WeatherQueryResult>;
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    endpoint: String,
    api_key: String,
    cache: ResponseCache,
}

impl WeatherClient {
    /// Client for the fixed endpoint and credential, caching under `cache_root`.
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            http: Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            cache: ResponseCache::new(cache_root),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.cache_root()?)
            .with_endpoint(config.endpoint())
            .with_api_key(config.api_key()))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Full GET URL for `near`. Coordinates are not range-checked.
    pub fn request_url(&self, near: Coordinate) -> String {
        format!(
            "{}?lat={}&lon={}&cnt={}&appid={}",
            self.endpoint, near.latitude, near.longitude, RESULT_LIMIT, self.api_key
        )
    }

    /// Like [`ObservationSource::fetch_observations`], but says what went wrong.
    ///
    /// The raw body is cached only after it decodes. A failed cache write is logged and
    /// does not fail the fetch.
    pub async fn try_fetch_observations(
        &self,
        near: Coordinate,
    ) -> Result<WeatherQueryResult, WeatherError> {
        tracing::debug!("Fetching observations near {}, {}", near.latitude, near.longitude);

        let res = self.http.get(self.request_url(near)).send().await?;
        tracing::debug!("Weather API responded with status {}", res.status());

        let body = res.bytes().await?;
        let result = decode_response(&body)?;

        if let Err(e) = self.cache.store(&body) {
            tracing::warn!("Failed to cache weather response: {}", e);
        }

        Ok(result)
    }

    /// Like [`ObservationSource::cached_observations`], but says what went wrong.
    /// An empty slot is `Ok(None)`.
    pub fn try_cached_observations(&self) -> Result<Option<WeatherQueryResult>, WeatherError> {
        self.cache.load().map(|bytes| decode_response(&bytes)).transpose()
    }

    /// Run a fetch in the background and hand its outcome to `on_complete`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn_fetch<F>(&self, near: Coordinate, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Option<WeatherQueryResult>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let result = client.fetch_observations(near).await;
            on_complete(result);
        })
    }
}

#[async_trait]
impl ObservationSource for WeatherClient {
    async fn fetch_observations(&self, near: Coordinate) -> Option<WeatherQueryResult> {
        match self.try_fetch_observations(near).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Weather fetch failed: {}", e);
                None
            }
        }
    }

    fn cached_observations(&self) -> Option<WeatherQueryResult> {
        match self.try_cached_observations() {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Cached weather response is no longer usable: {}", e);
                None
            }
        }
    }
}
