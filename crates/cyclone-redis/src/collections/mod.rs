//! Keyed collection facades.
//!
//! Each facade borrows the pool and owns its key. A method builds exactly one
//! command, clones the pool for a mutable handle and decodes the reply.

pub mod hash;
pub mod list;

pub use hash::Hash;
pub use list::List;

use redis::aio::ConnectionLike;
use redis::{Cmd, FromRedisValue};
use tracing::debug;

use crate::client::{CycloneError, CycloneResult};

/// `NAME key`, ready for further arguments.
pub(crate) fn command(name: &str, key: &str) -> Cmd {
    let mut cmd = redis::cmd(name);
    cmd.arg(key);
    cmd
}

/// Send one command and decode its reply.
pub(crate) async fn query<C, T>(pool: &C, name: &'static str, key: &str, cmd: &Cmd) -> CycloneResult<T>
where
    C: ConnectionLike + Clone,
    T: FromRedisValue,
{
    let mut conn = pool.clone();
    debug!(command = name, key, "Sending command");
    match cmd.query_async(&mut conn).await {
        Ok(reply) => Ok(reply),
        Err(e) => {
            let err = CycloneError::from(e);
            debug!(command = name, key, error = %err, "Command failed");
            Err(err)
        }
    }
}

/// Variadic commands need at least one argument; catch that before the
/// round trip.
pub(crate) fn require_args<T>(name: &str, args: &[T]) -> CycloneResult<()> {
    if args.is_empty() {
        return Err(CycloneError::InvalidArgument(format!(
            "{} needs at least one argument",
            name
        )));
    }
    Ok(())
}
