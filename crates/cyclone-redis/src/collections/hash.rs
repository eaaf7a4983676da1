//! Hash facade — HDEL, HEXISTS, HGET, HGETALL, HINCRBY, HINCRBYFLOAT, HKEYS,
//! HLEN, HMGET, HSCAN, HSET, HSETNX, HSTRLEN, HVALS.

use std::collections::HashMap;

use redis::aio::ConnectionLike;
use redis::ToRedisArgs;

use super::{command, query, require_args};
use crate::client::{CycloneError, CycloneResult};
use crate::scan::HashScan;

/// Hash stored at one key.
#[derive(Debug, Clone)]
pub struct Hash<'a, C> {
    pool: &'a C,
    key: String,
}

impl<'a, C> Hash<'a, C>
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

    pub(crate) fn pool(&self) -> &'a C {
        self.pool
    }

    /// Remove `fields`, returning how many existed. Missing fields and a
    /// missing key count as zero.
    ///
    /// `HDEL key field [field ...]`, O(N) in the number of fields.
    pub async fn del<F: ToRedisArgs>(&self, fields: &[F]) -> CycloneResult<usize> {
        require_args("HDEL", fields)?;
        let mut cmd = command("HDEL", &self.key);
        cmd.arg(fields);
        query(self.pool, "HDEL", &self.key, &cmd).await
    }

    /// `HEXISTS key field`
    pub async fn exists(&self, field: &str) -> CycloneResult<bool> {
        let mut cmd = command("HEXISTS", &self.key);
        cmd.arg(field);
        query(self.pool, "HEXISTS", &self.key, &cmd).await
    }

    /// Value of `field`, `None` when the field or the key is absent.
    ///
    /// `HGET key field`
    pub async fn get(&self, field: &str) -> CycloneResult<Option<String>> {
        let mut cmd = command("HGET", &self.key);
        cmd.arg(field);
        query(self.pool, "HGET", &self.key, &cmd).await
    }

    /// Every field and value. O(N) in the size of the hash; prefer
    /// [`Hash::scan`] for large hashes.
    ///
    /// `HGETALL key`
    pub async fn get_all(&self) -> CycloneResult<HashMap<String, String>> {
        let cmd = command("HGETALL", &self.key);
        query(self.pool, "HGETALL", &self.key, &cmd).await
    }

    /// Add `by` to the integer at `field` and return the new value. A missing
    /// field starts at 0. Bounded to the store's signed 64-bit range; overflow
    /// is reported by the store as a command error.
    ///
    /// `HINCRBY key field increment`
    pub async fn incr(&self, field: &str, by: i64) -> CycloneResult<i64> {
        let mut cmd = command("HINCRBY", &self.key);
        cmd.arg(field).arg(by);
        query(self.pool, "HINCRBY", &self.key, &cmd).await
    }

    /// Floating point counterpart of [`Hash::incr`]; a negative `by`
    /// decrements.
    ///
    /// `HINCRBYFLOAT key field increment`
    pub async fn incr_float(&self, field: &str, by: f64) -> CycloneResult<f64> {
        if !by.is_finite() {
            return Err(CycloneError::InvalidArgument(format!(
                "HINCRBYFLOAT increment must be finite, got {}",
                by
            )));
        }
        let mut cmd = command("HINCRBYFLOAT", &self.key);
        cmd.arg(field).arg(by);
        query(self.pool, "HINCRBYFLOAT", &self.key, &cmd).await
    }

    /// `HKEYS key`
    pub async fn keys(&self) -> CycloneResult<Vec<String>> {
        let cmd = command("HKEYS", &self.key);
        query(self.pool, "HKEYS", &self.key, &cmd).await
    }

    /// Number of fields. `HLEN key`
    pub async fn len(&self) -> CycloneResult<usize> {
        let cmd = command("HLEN", &self.key);
        query(self.pool, "HLEN", &self.key, &cmd).await
    }

    /// Values for `fields`, positionally; absent fields come back as `None`.
    ///
    /// `HMGET key field [field ...]`
    pub async fn mget<F: ToRedisArgs>(&self, fields: &[F]) -> CycloneResult<Vec<Option<String>>> {
        require_args("HMGET", fields)?;
        let mut cmd = command("HMGET", &self.key);
        cmd.arg(fields);
        query(self.pool, "HMGET", &self.key, &cmd).await
    }

    /// Incremental iteration over fields and values. See [`HashScan`].
    pub fn scan(&self) -> HashScan<'a, C> {
        HashScan::new(self.clone())
    }

    /// Set each `(field, value)` pair, overwriting existing fields. Returns
    /// how many fields were newly added.
    ///
    /// `HSET key field value [field value ...]`
    pub async fn set<F, V>(&self, pairs: &[(F, V)]) -> CycloneResult<usize>
    where
        F: ToRedisArgs,
        V: ToRedisArgs,
    {
        require_args("HSET", pairs)?;
        let mut cmd = command("HSET", &self.key);
        cmd.arg(pairs);
        query(self.pool, "HSET", &self.key, &cmd).await
    }

    /// Set `field` only if it does not exist yet. `false` means the field was
    /// already there and nothing changed.
    ///
    /// `HSETNX key field value`
    pub async fn set_nx(&self, field: &str, value: &str) -> CycloneResult<bool> {
        let mut cmd = command("HSETNX", &self.key);
        cmd.arg(field).arg(value);
        query(self.pool, "HSETNX", &self.key, &cmd).await
    }

    /// Byte length of the value at `field`, 0 when absent.
    ///
    /// `HSTRLEN key field`
    pub async fn str_len(&self, field: &str) -> CycloneResult<usize> {
        let mut cmd = command("HSTRLEN", &self.key);
        cmd.arg(field);
        query(self.pool, "HSTRLEN", &self.key, &cmd).await
    }

    /// `HVALS key`
    pub async fn vals(&self) -> CycloneResult<Vec<String>> {
        let cmd = command("HVALS", &self.key);
        query(self.pool, "HVALS", &self.key, &cmd).await
    }
}
