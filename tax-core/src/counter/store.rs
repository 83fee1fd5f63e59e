use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CounterError {
    #[error("counter store unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("counter command failed: {0}")]
    Command(String),

    #[error("counter command timed out after {0} ms")]
    Timeout(u128),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Persistent storage for a single visit counter.
///
/// Implementations report failures as [`CounterError`]; turning those into
/// safe defaults is the job of [`VisitCounter`](super::VisitCounter).
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Raw stored value, `None` when nothing has been stored yet.
    async fn read(&self) -> Result<Option<String>, CounterError>;

    /// Overwrites the stored value. The value never expires.
    async fn write(
        &self,
        value: i64,
    ) -> Result<(), CounterError>;

    /// Atomically adds one and returns the new value. A missing value counts
    /// as zero.
    async fn increment(&self) -> Result<i64, CounterError>;
}
