//! Redis caching helpers for backend services
//!
//! A thin wrapper over `redis`'s async connection manager: key validation,
//! JSON (de)serialization, bounded operation timeouts, duration-string TTLs
//! and the session-cache helpers. Domain violations surface as
//! [`AppError`]s; transport failures become `AppError(Server)` with the
//! redis error preserved on the `source()` chain.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use service_errors::AppError;
use tokio::time::timeout;

pub mod duration;
pub mod session;

pub use duration::Ttl;
pub use session::AuthDataAction;

/// Upper bound for any single Redis operation
const REDIS_TIMEOUT: Duration = Duration::from_secs(3);

/// Handle to a Redis cache
///
/// Cheap to clone; all clones share the underlying connection manager,
/// which reconnects on its own.
#[derive(Clone)]
pub struct Cache {
    connection_manager: ConnectionManager,
}

impl Cache {
    /// Connects to Redis and prepares the connection manager
    ///
    /// # Errors
    /// Returns `AppError(Validation)` when the URL is empty and
    /// `AppError(Server)` when the URL is invalid or the connection fails.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        if url.trim().is_empty() {
            return Err(AppError::validation("Redis connection URL is required"));
        }

        let client = Client::open(url)
            .map_err(|err| AppError::server("Invalid Redis connection URL").with_source(err))?;
        let connection_manager = ConnectionManager::new(client)
            .await
            .map_err(|err| AppError::server("Failed to connect to Redis").with_source(err))?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection_manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.connection_manager.clone()
    }

    /// Stores a value under a key, without expiry
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key or unserializable
    /// value, `AppError(Server)` on transport failure.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        check_key(key)?;
        let payload = serialize(value)?;
        let mut conn = self.conn();
        run(conn.set::<_, _, ()>(key, payload)).await
    }

    /// Stores a value under a key with a TTL
    ///
    /// The TTL accepts plain seconds or a duration string such as
    /// `"30 minutes"`; see [`duration::Ttl`].
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key, an unserializable
    /// value or an unparseable duration, `AppError(Server)` on transport
    /// failure.
    pub async fn set_ex<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: impl Into<Ttl>,
    ) -> Result<(), AppError> {
        check_key(key)?;
        let seconds = ttl.into().into_seconds()?;
        let payload = serialize(value)?;
        let mut conn = self.conn();
        run(conn.set_ex::<_, _, ()>(key, payload, seconds)).await
    }

    /// Fetches and deserializes a value
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key or a value that does
    /// not deserialize into `T`, `AppError(Server)` on transport failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let raw = self.get_raw(key).await?;
        raw.map(|data| {
            serde_json::from_str(&data).map_err(|err| {
                AppError::validation(format!("Cached value under '{key}' has an unexpected shape"))
                    .with_source(err)
            })
        })
        .transpose()
    }

    /// Fetches the raw string stored under a key, without parsing
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key, `AppError(Server)`
    /// on transport failure.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        check_key(key)?;
        let mut conn = self.conn();
        run(conn.get::<_, Option<String>>(key)).await
    }

    /// Deletes a key; `true` when something was removed
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key, `AppError(Server)`
    /// on transport failure.
    pub async fn delete(&self, key: &str) -> Result<bool, AppError> {
        check_key(key)?;
        let mut conn = self.conn();
        let removed: i64 = run(conn.del(key)).await?;
        Ok(removed > 0)
    }

    /// Deletes every key matching a pattern, returning the removed count
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty pattern,
    /// `AppError(Server)` on transport failure.
    pub async fn delete_all(&self, pattern: &str) -> Result<u64, AppError> {
        let keys = self.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn();
        let removed: u64 = run(conn.del(keys)).await?;
        Ok(removed)
    }

    /// Whether a key currently exists
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key, `AppError(Server)`
    /// on transport failure.
    pub async fn exists(&self, key: &str) -> Result<bool, AppError> {
        check_key(key)?;
        let mut conn = self.conn();
        run(conn.exists(key)).await
    }

    /// Remaining TTL in seconds (-1 without expiry, -2 for a missing key)
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key, `AppError(Server)`
    /// on transport failure.
    pub async fn ttl(&self, key: &str) -> Result<i64, AppError> {
        check_key(key)?;
        let mut conn = self.conn();
        run(conn.ttl(key)).await
    }

    /// Sets a key's TTL; `true` when the key existed
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty key or an unparseable
    /// duration, `AppError(Server)` on transport failure.
    pub async fn expire(&self, key: &str, ttl: impl Into<Ttl>) -> Result<bool, AppError> {
        check_key(key)?;
        let seconds = ttl.into().into_seconds()?;
        let seconds = i64::try_from(seconds)
            .map_err(|_| AppError::validation("Expiry duration is out of range"))?;
        let mut conn = self.conn();
        run(conn.expire(key, seconds)).await
    }

    /// Lists keys matching a pattern
    ///
    /// # Errors
    /// Returns `AppError(Validation)` for an empty pattern,
    /// `AppError(Server)` on transport failure.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, AppError> {
        if pattern.trim().is_empty() {
            return Err(AppError::validation("Redis key pattern must be a non-empty string"));
        }
        let mut conn = self.conn();
        run(conn.keys(pattern)).await
    }

    /// Flushes the current database
    ///
    /// # Errors
    /// Returns `AppError(Server)` on transport failure.
    pub async fn flush(&self) -> Result<(), AppError> {
        let mut conn = self.conn();
        run(redis::cmd("FLUSHDB").query_async::<()>(&mut conn)).await
    }
}

/// Keys must be non-empty; everything else is a caller bug we refuse early
fn check_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::validation("Redis key must be a non-empty string"));
    }
    Ok(())
}

fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|err| AppError::validation("Value cannot be serialized for caching").with_source(err))
}

/// Bounds a Redis future by [`REDIS_TIMEOUT`] and maps its failure modes
async fn run<T>(
    operation: impl std::future::Future<Output = redis::RedisResult<T>>,
) -> Result<T, AppError> {
    timeout(REDIS_TIMEOUT, operation)
        .await
        .map_err(|_| AppError::server("Redis operation timed out"))?
        .map_err(|err| AppError::server("Redis operation failed").with_source(err))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use service_errors::ErrorKind;

    use super::{check_key, serialize};

    #[test]
    fn empty_keys_are_rejected() {
        for key in ["", "   ", "\t"] {
            let err = check_key(key).expect_err("empty key must be rejected");
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(check_key("user:42").is_ok());
    }

    #[test]
    fn values_serialize_to_json() {
        assert_eq!(serialize("plain").expect("string"), "\"plain\"");
        assert_eq!(serialize(&7u32).expect("number"), "7");
        assert_eq!(
            serialize(&serde_json::json!({"id": "42"})).expect("object"),
            "{\"id\":\"42\"}"
        );
    }
}
