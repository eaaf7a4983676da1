//! Store connection handle and error types.

use redis::aio::{ConnectionLike, ConnectionManager};
use redis::ErrorKind;
use thiserror::Error;
use tracing::info;

use crate::collections::{Hash, List};
use crate::config::CycloneConfig;

/// Cyclone error types.
#[derive(Error, Debug)]
pub enum CycloneError {
    /// The store could not be reached or the connection broke mid-request.
    #[error("Redis connection error: {0}")]
    Connection(redis::RedisError),

    /// The store answered with an error reply, e.g. `WRONGTYPE ...`.
    #[error("Redis command error: {0}")]
    Command(String),

    /// The reply did not have the shape the command promises.
    #[error("Redis protocol error: {0}")]
    Protocol(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<redis::RedisError> for CycloneError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            return CycloneError::Connection(err);
        }
        match err.kind() {
            ErrorKind::IoError | ErrorKind::InvalidClientConfig | ErrorKind::AuthenticationFailed => {
                CycloneError::Connection(err)
            }
            ErrorKind::TypeError | ErrorKind::ParseError => {
                CycloneError::Protocol(err.to_string())
            }
            _ => CycloneError::Command(server_message(&err)),
        }
    }
}

/// `CODE detail` as the store sent it, or the client's rendering otherwise.
fn server_message(err: &redis::RedisError) -> String {
    match (err.code(), err.detail()) {
        (Some(code), Some(detail)) => format!("{} {}", code, detail),
        _ => err.to_string(),
    }
}

/// Result type for Cyclone operations.
pub type CycloneResult<T> = Result<T, CycloneError>;

/// Redis connection pool — ConnectionManager handles multiplexing internally.
/// It is Clone, so callers clone it to get a mutable handle for each operation.
pub type RedisPool = ConnectionManager;

/// Initialize a Redis connection pool from a config.
///
/// Example URL: `redis://127.0.0.1:6379`
pub async fn init_pool(config: &CycloneConfig) -> CycloneResult<RedisPool> {
    let client = redis::Client::open(config.url.as_str())?;
    let manager = ConnectionManager::new_with_config(client, config.manager_config()).await?;
    info!(url = %config.url, "Connected to Redis");
    Ok(manager)
}

/// Entry point: a pooled connection that hands out keyed collections.
///
/// Generic over the connection so that anything implementing
/// [`redis::aio::ConnectionLike`] can back it; production code uses
/// [`RedisPool`].
#[derive(Clone)]
pub struct Cyclone<C = RedisPool> {
    pool: C,
}

impl Cyclone<RedisPool> {
    /// Connect using an explicit config.
    pub async fn connect(config: &CycloneConfig) -> CycloneResult<Self> {
        Ok(Self::new(init_pool(config).await?))
    }

    /// Connect using [`CycloneConfig::from_env`].
    pub async fn from_env() -> CycloneResult<Self> {
        Self::connect(&CycloneConfig::from_env()?).await
    }
}

impl<C> Cyclone<C>
where
    C: ConnectionLike + Clone,
{
    pub fn new(pool: C) -> Self {
        Self { pool }
    }

    /// The underlying connection, for commands the facades do not cover.
    pub fn raw(&self) -> &C {
        &self.pool
    }

    /// Hash stored at `key`.
    pub fn hash(&self, key: impl Into<String>) -> Hash<'_, C> {
        Hash::new(&self.pool, key)
    }

    /// List stored at `key`.
    pub fn list(&self, key: impl Into<String>) -> List<'_, C> {
        List::new(&self.pool, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::server_error;

    #[test]
    fn test_io_error_is_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err: CycloneError = redis::RedisError::from(io).into();
        assert!(matches!(err, CycloneError::Connection(_)));
    }

    #[test]
    fn test_invalid_config_is_connection() {
        let err: CycloneError =
            redis::RedisError::from((ErrorKind::InvalidClientConfig, "Redis URL did not parse"))
                .into();
        assert!(matches!(err, CycloneError::Connection(_)));
    }

    #[test]
    fn test_type_error_is_protocol() {
        let err: CycloneError =
            redis::RedisError::from((ErrorKind::TypeError, "Response was of incompatible type"))
                .into();
        assert!(matches!(err, CycloneError::Protocol(_)));
    }

    #[test]
    fn test_server_reply_is_command_with_message() {
        let err: CycloneError = redis::RedisError::from((
            ErrorKind::ResponseError,
            "An error was signalled by the server",
            "index out of range".to_string(),
        ))
        .into();
        match err {
            CycloneError::Command(msg) => assert_eq!(msg, "ERR index out of range"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_is_protocol() {
        let err: CycloneError =
            redis::RedisError::from((ErrorKind::ParseError, "parse error", "bad line".to_string()))
                .into();
        assert!(matches!(err, CycloneError::Protocol(_)));
    }

    #[test]
    fn test_malformed_reply_is_protocol() {
        let err: CycloneError = redis::parse_redis_value(b"?garbage\r\n").unwrap_err().into();
        assert!(matches!(err, CycloneError::Protocol(_)));
    }

    #[test]
    fn test_extension_error_keeps_code() {
        let err: CycloneError =
            server_error("WRONGTYPE Operation against a key holding the wrong kind of value").into();
        match err {
            CycloneError::Command(msg) => assert_eq!(
                msg,
                "WRONGTYPE Operation against a key holding the wrong kind of value"
            ),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
