//! Service registration
//!
//! Hands out contact resolvers either as one shared instance or as a fresh
//! instance per scope. The client provider is always shared.

use std::sync::{Arc, OnceLock};

use hl_core::{ClientProvider, HighLevelClientProvider, HighLevelConfig};

use crate::resolver::ContactsUtil;

/// Registry of the HighLevel services used by a host application
pub struct HighLevelServices {
    config: HighLevelConfig,
    provider: OnceLock<Arc<dyn ClientProvider>>,
    contacts: OnceLock<Arc<ContactsUtil>>,
}

impl HighLevelServices {
    /// Register with the default reqwest-backed client provider
    pub fn new(config: HighLevelConfig) -> Self {
        Self {
            config,
            provider: OnceLock::new(),
            contacts: OnceLock::new(),
        }
    }

    /// Register with a custom client provider
    pub fn with_client_provider(config: HighLevelConfig, provider: Arc<dyn ClientProvider>) -> Self {
        let services = Self::new(config);
        let _ = services.provider.set(provider);
        services
    }

    /// Configuration the services were registered with
    pub fn config(&self) -> &HighLevelConfig {
        &self.config
    }

    /// The shared client provider, created on first use
    pub fn client_provider(&self) -> Arc<dyn ClientProvider> {
        Arc::clone(self.provider.get_or_init(|| {
            let provider: Arc<dyn ClientProvider> =
                Arc::new(HighLevelClientProvider::new(self.config.clone()));
            provider
        }))
    }

    /// The process wide resolver; every call returns the same instance
    pub fn contacts_singleton(&self) -> Arc<ContactsUtil> {
        Arc::clone(
            self.contacts
                .get_or_init(|| Arc::new(self.contacts_scoped())),
        )
    }

    /// A new resolver for the caller's scope, sharing the client provider
    pub fn contacts_scoped(&self) -> ContactsUtil {
        ContactsUtil::new(self.client_provider(), &self.config)
    }
}
