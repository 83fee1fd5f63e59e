use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::noop::NoopCounterStore;
use super::store::CounterStore;

/// Upper bound on a single increment before the fallback value is returned.
pub const DEFAULT_INCREMENT_TIMEOUT: Duration = Duration::from_secs(1);

/// Value reported by [`VisitCounter::increment_count`] when the store cannot
/// answer in time.
pub const FALLBACK_INCREMENT: i64 = 1;

/// Best-effort visit counter.
///
/// Wraps a [`CounterStore`] and never fails its caller: reads fall back to
/// `0`, writes are dropped and increments report `1` whenever the store is
/// unreachable, slow, or holds something that is not a number. Every
/// fallback is logged.
pub struct VisitCounter {
    store: Box<dyn CounterStore>,
    increment_timeout: Duration,
}

impl VisitCounter {
    pub fn new(store: Box<dyn CounterStore>) -> Self {
        Self {
            store,
            increment_timeout: DEFAULT_INCREMENT_TIMEOUT,
        }
    }

    /// A counter that persists nothing.
    pub fn disabled() -> Self {
        Self::new(Box::new(NoopCounterStore))
    }

    pub fn with_increment_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.increment_timeout = timeout;
        self
    }

    /// Persisted count, or `0` when it is missing or cannot be read.
    pub async fn get_count(&self) -> i64 {
        match self.store.read().await {
            Ok(Some(raw)) => match raw.trim().parse::<i64>() {
                Ok(count) => {
                    debug!(count, "read visit count");
                    count
                }
                Err(e) => {
                    warn!(value = %raw, "stored visit count is not a number: {}", e);
                    0
                }
            },
            Ok(None) => {
                info!("visit count not stored yet, starting from 0");
                0
            }
            Err(e) => {
                warn!("visit count unavailable, returning 0: {}", e);
                0
            }
        }
    }

    /// Stores `count`. Failures are logged and swallowed.
    pub async fn save_count(
        &self,
        count: i64,
    ) {
        match self.store.write(count).await {
            Ok(()) => debug!(count, "saved visit count"),
            Err(e) => error!(count, "failed to save visit count: {}", e),
        }
    }

    /// Atomically increments the stored count and returns the new value,
    /// or [`FALLBACK_INCREMENT`] on failure or timeout.
    pub async fn increment_count(&self) -> i64 {
        match tokio::time::timeout(self.increment_timeout, self.store.increment()).await {
            Ok(Ok(count)) => {
                debug!(count, "incremented visit count");
                count
            }
            Ok(Err(e)) => {
                error!("failed to increment visit count: {}", e);
                FALLBACK_INCREMENT
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.increment_timeout.as_millis() as u64,
                    "visit count increment timed out"
                );
                FALLBACK_INCREMENT
            }
        }
    }
}

impl Default for VisitCounter {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::counter::CounterError;

    /// In-process store with an atomic counter, shared through an `Arc` so
    /// tests can inspect it after handing a box to the `VisitCounter`.
    #[derive(Clone, Default)]
    struct MemoryStore {
        value: Arc<AtomicI64>,
        raw_override: Arc<Mutex<Option<String>>>,
        present: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl CounterStore for MemoryStore {
        async fn read(&self) -> Result<Option<String>, CounterError> {
            if let Some(raw) = self.raw_override.lock().unwrap().clone() {
                return Ok(Some(raw));
            }
            if !*self.present.lock().unwrap() {
                return Ok(None);
            }
            Ok(Some(self.value.load(Ordering::SeqCst).to_string()))
        }

        async fn write(
            &self,
            value: i64,
        ) -> Result<(), CounterError> {
            *self.present.lock().unwrap() = true;
            self.value.store(value, Ordering::SeqCst);
            Ok(())
        }

        async fn increment(&self) -> Result<i64, CounterError> {
            *self.present.lock().unwrap() = true;
            Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    struct FailingStore;

    #[async_trait]
    impl CounterStore for FailingStore {
        async fn read(&self) -> Result<Option<String>, CounterError> {
            Err(CounterError::Connection("connection refused".to_string()))
        }

        async fn write(
            &self,
            _value: i64,
        ) -> Result<(), CounterError> {
            Err(CounterError::Connection("connection refused".to_string()))
        }

        async fn increment(&self) -> Result<i64, CounterError> {
            Err(CounterError::Connection("connection refused".to_string()))
        }
    }

    struct SlowStore;

    #[async_trait]
    impl CounterStore for SlowStore {
        async fn read(&self) -> Result<Option<String>, CounterError> {
            Ok(Some("41".to_string()))
        }

        async fn write(
            &self,
            _value: i64,
        ) -> Result<(), CounterError> {
            Ok(())
        }

        async fn increment(&self) -> Result<i64, CounterError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(42)
        }
    }

    #[tokio::test]
    async fn disabled_counter_returns_safe_defaults() {
        let counter = VisitCounter::disabled();

        assert_eq!(counter.get_count().await, 0);
        counter.save_count(10).await;
        assert_eq!(counter.increment_count().await, 1);
        assert_eq!(counter.increment_count().await, 1);
    }

    #[tokio::test]
    async fn unreachable_store_never_fails_the_caller() {
        let counter = VisitCounter::new(Box::new(FailingStore));

        assert_eq!(counter.get_count().await, 0);
        counter.save_count(3).await;
        for _ in 0..5 {
            assert_eq!(counter.increment_count().await, FALLBACK_INCREMENT);
        }
    }

    #[tokio::test]
    async fn slow_increment_falls_back_after_timeout() {
        let counter =
            VisitCounter::new(Box::new(SlowStore)).with_increment_timeout(Duration::from_millis(20));

        assert_eq!(counter.increment_count().await, FALLBACK_INCREMENT);
    }

    #[tokio::test]
    async fn missing_count_reads_as_zero() {
        let counter = VisitCounter::new(Box::new(MemoryStore::default()));

        assert_eq!(counter.get_count().await, 0);
    }

    #[tokio::test]
    async fn non_numeric_count_reads_as_zero() {
        let store = MemoryStore::default();
        *store.raw_override.lock().unwrap() = Some("many".to_string());
        let counter = VisitCounter::new(Box::new(store));

        assert_eq!(counter.get_count().await, 0);
    }

    #[tokio::test]
    async fn save_then_get_returns_saved_value() {
        let counter = VisitCounter::new(Box::new(MemoryStore::default()));

        counter.save_count(41).await;

        assert_eq!(counter.get_count().await, 41);
        assert_eq!(counter.increment_count().await, 42);
    }

    #[tokio::test]
    async fn first_increment_creates_the_count() {
        let counter = VisitCounter::new(Box::new(MemoryStore::default()));

        assert_eq!(counter.increment_count().await, 1);
        assert_eq!(counter.get_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_increments_lose_no_updates() {
        let store = MemoryStore::default();
        let counter = Arc::new(VisitCounter::new(Box::new(store.clone())));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let counter = Arc::clone(&counter);
                tokio::spawn(async move { counter.increment_count().await })
            })
            .collect();

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=50).collect::<Vec<i64>>());
        assert_eq!(store.value.load(Ordering::SeqCst), 50);
    }
}
