//! Redis-backed [`CounterStore`].
//!
//! The counter lives under a single key with no expiry. Increments use
//! `INCR`, so concurrent callers never lose updates.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisResult};
use tracing::{debug, info};

use tax_core::counter::{CounterConfig, CounterError, CounterStore, CounterStoreFactory};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct RedisCounterStore {
    conn: MultiplexedConnection,
    key: String,
    command_timeout: Duration,
}

impl RedisCounterStore {
    /// Open a multiplexed connection to `url`, giving up after
    /// [`CONNECT_TIMEOUT`].
    pub async fn connect(
        url: &str,
        key: impl Into<String>,
    ) -> Result<Self, CounterError> {
        let client = redis::Client::open(url).map_err(|e| CounterError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(CONNECT_TIMEOUT, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| CounterError::Timeout(CONNECT_TIMEOUT.as_millis()))?
            .map_err(|e| CounterError::Connection(e.to_string()))?;

        let key = key.into();
        info!(key = %key, "connected to redis counter store");

        Ok(Self {
            conn,
            key,
            command_timeout: COMMAND_TIMEOUT,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn run<T>(
        &self,
        command: impl Future<Output = RedisResult<T>>,
    ) -> Result<T, CounterError> {
        tokio::time::timeout(self.command_timeout, command)
            .await
            .map_err(|_| CounterError::Timeout(self.command_timeout.as_millis()))?
            .map_err(|e| CounterError::Command(e.to_string()))
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn read(&self) -> Result<Option<String>, CounterError> {
        let mut conn = self.conn.clone();
        let value = self.run(conn.get::<_, Option<String>>(&self.key)).await?;
        debug!(key = %self.key, ?value, "GET");
        Ok(value)
    }

    async fn write(
        &self,
        value: i64,
    ) -> Result<(), CounterError> {
        let mut conn = self.conn.clone();
        self.run(conn.set::<_, _, ()>(&self.key, value)).await?;
        debug!(key = %self.key, value, "SET");
        Ok(())
    }

    async fn increment(&self) -> Result<i64, CounterError> {
        let mut conn = self.conn.clone();
        let value = self.run(conn.incr::<_, _, i64>(&self.key, 1)).await?;
        debug!(key = %self.key, value, "INCR");
        Ok(value)
    }
}

/// [`CounterStoreFactory`] for Redis.
///
/// ```rust,no_run
/// use tax_core::counter::CounterStoreRegistry;
/// use tax_counter_redis::RedisCounterStoreFactory;
///
/// let mut registry = CounterStoreRegistry::new();
/// registry.register(Box::new(RedisCounterStoreFactory));
/// ```
pub struct RedisCounterStoreFactory;

#[async_trait]
impl CounterStoreFactory for RedisCounterStoreFactory {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    /// `config.connection_string` is a Redis URL such as
    /// `redis://127.0.0.1:6379/0`.
    async fn create(
        &self,
        config: &CounterConfig,
    ) -> Result<Box<dyn CounterStore>, CounterError> {
        let store = RedisCounterStore::connect(&config.connection_string, config.key.clone()).await?;
        Ok(Box::new(store))
    }
}
