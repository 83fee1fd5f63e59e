use async_trait::async_trait;

use super::factory::{CounterConfig, CounterStoreFactory};
use super::store::{CounterError, CounterStore};

const REASON: &str = "no counter backend configured";

/// Store used when persistence is switched off. Every call reports
/// [`CounterError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCounterStore;

#[async_trait]
impl CounterStore for NoopCounterStore {
    async fn read(&self) -> Result<Option<String>, CounterError> {
        Err(CounterError::Unavailable(REASON.to_string()))
    }

    async fn write(
        &self,
        _value: i64,
    ) -> Result<(), CounterError> {
        Err(CounterError::Unavailable(REASON.to_string()))
    }

    async fn increment(&self) -> Result<i64, CounterError> {
        Err(CounterError::Unavailable(REASON.to_string()))
    }
}

/// [`CounterStoreFactory`] for the `"none"` backend.
pub struct NoopCounterStoreFactory;

#[async_trait]
impl CounterStoreFactory for NoopCounterStoreFactory {
    fn backend_name(&self) -> &'static str {
        "none"
    }

    async fn create(
        &self,
        _config: &CounterConfig,
    ) -> Result<Box<dyn CounterStore>, CounterError> {
        Ok(Box::new(NoopCounterStore))
    }
}
