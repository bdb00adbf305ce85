//! Client provider
//!
//! Turns an API key into a live transport. One [`HighLevelClient`] is built
//! per key and reused for every later call with the same key.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::client::{ContactsTransport, HighLevelClient};
use crate::config::HighLevelConfig;
use crate::error::{Error, Result};

/// Source of transport handles
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Acquire a transport authenticated with `api_key`
    async fn acquire(
        &self,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<dyn ContactsTransport>>;
}

/// Default provider backed by reqwest clients
pub struct HighLevelClientProvider {
    config: HighLevelConfig,
    clients: DashMap<String, Arc<HighLevelClient>>,
}

impl HighLevelClientProvider {
    /// Create a provider; clients are built lazily on first use
    pub fn new(config: HighLevelConfig) -> Self {
        Self {
            config,
            clients: DashMap::new(),
        }
    }

    /// Number of API keys with a cached client
    pub fn cached_clients(&self) -> usize {
        self.clients.len()
    }

    fn client_for(&self, api_key: &str) -> Result<Arc<HighLevelClient>> {
        if let Some(client) = self.clients.get(api_key) {
            return Ok(Arc::clone(client.value()));
        }

        let client = Arc::new(HighLevelClient::new(&self.config, api_key)?);
        let client = Arc::clone(
            self.clients
                .entry(api_key.to_string())
                .or_insert(client)
                .value(),
        );

        debug!("Created HighLevel client for {}", client.base_url());
        Ok(client)
    }
}

#[async_trait]
impl ClientProvider for HighLevelClientProvider {
    async fn acquire(
        &self,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<dyn ContactsTransport>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let api_key = match api_key.trim() {
            "" => self
                .config
                .api_key
                .as_deref()
                .ok_or_else(|| Error::Config("No HighLevel API key provided".to_string()))?,
            key => key,
        };

        let client: Arc<dyn ContactsTransport> = self.client_for(api_key)?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reuses_client_per_key() {
        let provider = HighLevelClientProvider::new(HighLevelConfig::default());
        let cancel = CancellationToken::new();

        let first = provider.acquire("pit-1", &cancel).await.unwrap();
        let second = provider.acquire("pit-1", &cancel).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.cached_clients(), 1);

        provider.acquire("pit-2", &cancel).await.unwrap();
        assert_eq!(provider.cached_clients(), 2);
    }

    #[tokio::test]
    async fn test_empty_key_falls_back_to_config() {
        let provider =
            HighLevelClientProvider::new(HighLevelConfig::default().with_api_key("pit-default"));
        let cancel = CancellationToken::new();

        assert!(provider.acquire("", &cancel).await.is_ok());
        assert_eq!(provider.cached_clients(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let provider = HighLevelClientProvider::new(HighLevelConfig::default());
        let result = provider.acquire("", &CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_acquire_honours_cancellation() {
        let provider = HighLevelClientProvider::new(HighLevelConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = provider.acquire("pit-1", &cancel).await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(provider.cached_clients(), 0);
    }
}
