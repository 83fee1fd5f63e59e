use std::collections::HashMap;

use async_trait::async_trait;

use super::store::{CounterError, CounterStore};

/// Key the counter is stored under unless configured otherwise.
pub const DEFAULT_COUNTER_KEY: &str = "oduko:user-count";

/// Backend-agnostic counter store configuration.
///
/// `backend` must match the [`CounterStoreFactory::backend_name`] of a
/// registered factory. `connection_string` is passed through to that
/// factory unchanged.
///
/// | backend | connection_string examples    |
/// |---------|-------------------------------|
/// | `none`  | ignored                       |
/// | `redis` | `redis://127.0.0.1:6379/0`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"redis"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
    /// Name of the stored counter.
    pub key: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            backend: "none".to_string(),
            connection_string: String::new(),
            key: DEFAULT_COUNTER_KEY.to_string(),
        }
    }
}

/// One implementation per counter backend, registered with a
/// [`CounterStoreRegistry`] at startup.
#[async_trait]
pub trait CounterStoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Connect and return a ready-to-use store.
    async fn create(
        &self,
        config: &CounterConfig,
    ) -> Result<Box<dyn CounterStore>, CounterError>;
}

/// Registry of [`CounterStoreFactory`] instances, keyed by backend name.
pub struct CounterStoreRegistry {
    factories: HashMap<&'static str, Box<dyn CounterStoreFactory>>,
}

impl CounterStoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any factory with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn CounterStoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`CounterError::Configuration`] when no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &CounterConfig,
    ) -> Result<Box<dyn CounterStore>, CounterError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                CounterError::Configuration(format!(
                    "unknown counter backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for CounterStoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
