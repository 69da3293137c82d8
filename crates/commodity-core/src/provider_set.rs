use tracing::debug;

use crate::providers::MockProvider;
use crate::{DataProvider, ProviderError, ProviderId};

/// Registered providers, in registration order.
#[derive(Default)]
pub struct ProviderSet {
    providers: Vec<Box<dyn DataProvider>>,
}

impl ProviderSet {
    /// A set with no providers. Every lookup reports "not registered".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&dyn DataProvider> {
        self.providers
            .iter()
            .find(|provider| provider.id() == *id)
            .map(Box::as_ref)
    }

    /// Like [`get`](Self::get), as a `Result` callers can log.
    pub fn require(&self, id: &str) -> Result<&dyn DataProvider, ProviderError> {
        self.get(id)
            .ok_or_else(|| ProviderError::not_registered(id))
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|provider| provider.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DataProvider> {
        self.providers.iter().map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet")
            .field("providers", &self.ids())
            .finish()
    }
}

/// Builder for a [`ProviderSet`].
///
/// ```rust,ignore
/// use commodity_core::ProviderSetBuilder;
///
/// // Deterministic offline providers
/// let providers = ProviderSetBuilder::new().with_mock_mode().build();
///
/// // Or bring your own
/// let providers = ProviderSetBuilder::new()
///     .with_provider(MyYahooClient::new())
///     .build();
/// ```
#[derive(Default)]
pub struct ProviderSetBuilder {
    use_mock: bool,
    providers: Vec<Box<dyn DataProvider>>,
}

impl ProviderSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the offline `yahoo` and `ft` mock providers.
    pub fn with_mock_mode(mut self) -> Self {
        self.use_mock = true;
        self
    }

    /// Register a provider. A later provider with the same id replaces an earlier one.
    pub fn with_provider(mut self, provider: impl DataProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn build(self) -> ProviderSet {
        let mut registered: Vec<Box<dyn DataProvider>> = Vec::new();

        if self.use_mock {
            registered.push(Box::new(MockProvider::yahoo()));
            registered.push(Box::new(MockProvider::ft()));
        }

        for provider in self.providers {
            let id = provider.id();
            match registered.iter().position(|existing| existing.id() == id) {
                Some(slot) => registered[slot] = provider,
                None => registered.push(provider),
            }
        }

        let set = ProviderSet {
            providers: registered,
        };
        debug!(providers = ?set.ids(), "provider set built");
        set
    }
}
