//! Cyclone Redis Layer
//!
//! Typed facades over a pooled Redis connection. [`Hash`] and [`List`] bind a
//! key to the pool and map each method onto one Redis command; [`HashScan`]
//! turns HSCAN into a [`ScanStream`].

pub mod client;
pub mod collections;
pub mod config;
pub mod scan;

#[cfg(test)]
mod testing;

pub use client::{Cyclone, CycloneError, CycloneResult, RedisPool, init_pool};
pub use collections::{Hash, List};
pub use config::{CycloneConfig, DEFAULT_REDIS_URL};
pub use scan::{CURSOR_START, HashField, HashScan, ScanOptions, ScanState, ScanStream};
