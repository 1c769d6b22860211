//! Static metadata fetching and caching.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use url::Url;

use crate::config::schema::MetadataConfig;
use crate::error::{MintError, MintResult};
use crate::metadata::types::{TokenMetadata, TokenView};

/// Fetches `/metadata/{id}.json` and keeps every successful answer.
///
/// Metadata files never change once published, so entries are not expired.
#[derive(Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: Url,
    cache: Arc<DashMap<u64, TokenMetadata>>,
    max_concurrent: usize,
}

impl MetadataClient {
    pub fn new(config: &MetadataConfig) -> MintResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MintError::RemoteRead(format!("Invalid metadata base URL '{}': {}", config.base_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MintError::RemoteRead(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            cache: Arc::new(DashMap::new()),
            max_concurrent: config.max_concurrent_fetches.max(1),
        })
    }

    fn resource(&self, token_id: u64, extension: &str) -> MintResult<Url> {
        self.base_url
            .join(&format!("/metadata/{}.{}", token_id, extension))
            .map_err(|e| MintError::RemoteRead(format!("metadata URL: {}", e)))
    }

    /// URL of the token image.
    pub fn image_url(&self, token_id: u64) -> MintResult<Url> {
        self.resource(token_id, "png")
    }

    /// Metadata for one token, from cache when already fetched.
    pub async fn fetch(&self, token_id: u64) -> MintResult<TokenMetadata> {
        if let Some(hit) = self.cache.get(&token_id) {
            return Ok(hit.value().clone());
        }

        let url = self.resource(token_id, "json")?;
        let mut metadata: TokenMetadata = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| MintError::RemoteRead(format!("metadata {}: {}", token_id, e)))?
            .json()
            .await
            .map_err(|e| MintError::RemoteRead(format!("metadata {}: {}", token_id, e)))?;

        metadata.image = self.image_url(token_id)?.to_string();

        tracing::debug!(token_id, url = %url, name = %metadata.name, "Metadata fetched");
        self.cache.insert(token_id, metadata.clone());
        Ok(metadata)
    }

    /// Metadata for several tokens in input order.
    ///
    /// At most `max_concurrent_fetches` requests run at once. The first
    /// failure stops the listing.
    pub async fn fetch_many(&self, token_ids: &[u64]) -> MintResult<Vec<TokenView>> {
        stream::iter(token_ids.iter().copied())
            .map(|token_id| async move {
                let metadata = self.fetch(token_id).await?;
                Ok::<_, MintError>(TokenView { token_id, metadata })
            })
            .buffered(self.max_concurrent)
            .try_collect()
            .await
    }

    /// Number of cached entries.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for MetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataClient")
            .field("base_url", &self.base_url.as_str())
            .field("cached", &self.cache.len())
            .finish()
    }
}
