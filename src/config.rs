//! Configuration Module
//!
//! Handles loading cache configuration from environment variables or an
//! embedding application's config file.

use std::env;
use std::hash::Hash;

use serde::Deserialize;

use crate::cache::{LruCache, SharedCache};
use crate::error::{CacheError, Result};

/// Capacity used when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Environment variable holding the cache capacity.
pub const CAPACITY_ENV_VAR: &str = "CACHE_CAPACITY";

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries held at the same time
    pub capacity: usize,
}

impl Config {
    /// Creates a config with an explicit capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    ///
    /// Values that fail to parse fall back to the default.
    pub fn from_env() -> Self {
        Self {
            capacity: env::var(CAPACITY_ENV_VAR)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        }
    }

    /// Checks that the configuration can build a cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 1 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// Builds a single-owner cache from this configuration.
    pub fn build<K, V>(&self) -> Result<LruCache<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        self.validate()?;
        LruCache::new(self.capacity)
    }

    /// Builds a lock-guarded cache handle from this configuration.
    pub fn build_shared<K, V>(&self) -> Result<SharedCache<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        self.validate()?;
        SharedCache::new(self.capacity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
