//! List facade. Head-side commands (LPUSH, LPOP, ...) use the plain names;
//! tail-side ones carry an `r` prefix, as in Redis.

use redis::aio::ConnectionLike;
use redis::ToRedisArgs;

use super::{command, query, require_args};
use crate::client::CycloneResult;

/// List stored at one key.
#[derive(Debug, Clone)]
pub struct List<'a, C> {
    pool: &'a C,
    key: String,
}

impl<'a, C> List<'a, C>
where
    C: ConnectionLike + Clone,
{
    pub fn new(pool: &'a C, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Element at `index`; negative indexes count from the tail. `None` when
    /// out of range.
    ///
    /// `LINDEX key index`
    pub async fn index(&self, index: i64) -> CycloneResult<Option<String>> {
        let mut cmd = command("LINDEX", &self.key);
        cmd.arg(index);
        query(self.pool, "LINDEX", &self.key, &cmd).await
    }

    /// `LLEN key`
    pub async fn len(&self) -> CycloneResult<usize> {
        let cmd = command("LLEN", &self.key);
        query(self.pool, "LLEN", &self.key, &cmd).await
    }

    /// Remove and return the head element.
    ///
    /// `LPOP key`
    pub async fn pop(&self) -> CycloneResult<Option<String>> {
        let cmd = command("LPOP", &self.key);
        query(self.pool, "LPOP", &self.key, &cmd).await
    }

    /// Insert `elems` at the head, one after another, so the last one ends up
    /// first. Returns the list length afterwards.
    ///
    /// `LPUSH key element [element ...]`
    pub async fn push<E: ToRedisArgs>(&self, elems: &[E]) -> CycloneResult<usize> {
        require_args("LPUSH", elems)?;
        let mut cmd = command("LPUSH", &self.key);
        cmd.arg(elems);
        query(self.pool, "LPUSH", &self.key, &cmd).await
    }

    /// Like [`List::push`], but only when the list already exists; returns 0
    /// otherwise.
    ///
    /// `LPUSHX key element [element ...]`
    pub async fn push_x<E: ToRedisArgs>(&self, elems: &[E]) -> CycloneResult<usize> {
        require_args("LPUSHX", elems)?;
        let mut cmd = command("LPUSHX", &self.key);
        cmd.arg(elems);
        query(self.pool, "LPUSHX", &self.key, &cmd).await
    }

    /// Elements from `start` to `stop`, both inclusive. `range(0, -1)` is the
    /// whole list; out of range offsets give an empty vec.
    ///
    /// `LRANGE key start stop`
    pub async fn range(&self, start: i64, stop: i64) -> CycloneResult<Vec<String>> {
        let mut cmd = command("LRANGE", &self.key);
        cmd.arg(start).arg(stop);
        query(self.pool, "LRANGE", &self.key, &cmd).await
    }

    /// Remove occurrences of `elem`: the first `count` from the head when
    /// `count > 0`, the last `-count` from the tail when `count < 0`, all of
    /// them when `count == 0`. Returns how many were removed.
    ///
    /// `LREM key count element`
    pub async fn rem(&self, count: i64, elem: &str) -> CycloneResult<usize> {
        let mut cmd = command("LREM", &self.key);
        cmd.arg(count).arg(elem);
        query(self.pool, "LREM", &self.key, &cmd).await
    }

    /// Overwrite the element at `index`. A missing key or an out of range
    /// index is a [`CycloneError::Command`](crate::CycloneError::Command).
    ///
    /// `LSET key index element`
    pub async fn set(&self, index: i64, elem: &str) -> CycloneResult<()> {
        let mut cmd = command("LSET", &self.key);
        cmd.arg(index).arg(elem);
        query(self.pool, "LSET", &self.key, &cmd).await
    }

    /// Keep only the elements from `start` to `stop`, inclusive.
    ///
    /// `LTRIM key start stop`
    pub async fn trim(&self, start: i64, stop: i64) -> CycloneResult<()> {
        let mut cmd = command("LTRIM", &self.key);
        cmd.arg(start).arg(stop);
        query(self.pool, "LTRIM", &self.key, &cmd).await
    }

    /// `RPOP key`
    pub async fn rpop(&self) -> CycloneResult<Option<String>> {
        let cmd = command("RPOP", &self.key);
        query(self.pool, "RPOP", &self.key, &cmd).await
    }

    /// Append `elems` at the tail, in order.
    ///
    /// `RPUSH key element [element ...]`
    pub async fn rpush<E: ToRedisArgs>(&self, elems: &[E]) -> CycloneResult<usize> {
        require_args("RPUSH", elems)?;
        let mut cmd = command("RPUSH", &self.key);
        cmd.arg(elems);
        query(self.pool, "RPUSH", &self.key, &cmd).await
    }

    /// `RPUSHX key element [element ...]`
    pub async fn rpush_x<E: ToRedisArgs>(&self, elems: &[E]) -> CycloneResult<usize> {
        require_args("RPUSHX", elems)?;
        let mut cmd = command("RPUSHX", &self.key);
        cmd.arg(elems);
        query(self.pool, "RPUSHX", &self.key, &cmd).await
    }
}
