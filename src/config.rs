//! Configuration Module
//!
//! Handles loading cache defaults from environment variables.

use std::env;
use std::time::Duration;

use crate::tiers::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the memory tier can hold
    pub memory_max_entries: usize,
    /// Default TTL in seconds for memory-tier entries without explicit TTL
    pub memory_default_ttl_secs: u64,
    /// Namespace prefix for persistent-tier storage keys
    pub persistent_namespace: String,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment
    /// variables.
    ///
    /// # Environment Variables
    /// - `MEMORY_MAX_ENTRIES` - Maximum memory-tier entries (default: 500)
    /// - `MEMORY_DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `PERSISTENT_NAMESPACE` - Persistent key prefix (default: "shared-cache")
    pub fn from_env() -> Self {
        Self {
            memory_max_entries: env::var("MEMORY_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            memory_default_ttl_secs: env::var("MEMORY_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            persistent_namespace: env::var("PERSISTENT_NAMESPACE")
                .unwrap_or_else(|_| "shared-cache".to_string()),
        }
    }

    /// Default TTL as a Duration.
    pub fn memory_default_ttl(&self) -> Duration {
        Duration::from_secs(self.memory_default_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_max_entries: DEFAULT_MAX_ENTRIES,
            memory_default_ttl_secs: DEFAULT_TTL_SECS,
            persistent_namespace: "shared-cache".to_string(),
        }
    }
}
