//! Cache Entry Module
//!
//! Defines the in-memory representation of a single cached value with its
//! TTL metadata.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::value::CacheValue;

// == Cache Entry ==
/// A cached value with creation and expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    pub fn new(value: CacheValue, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now + ttl.as_millis() as u64);

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiration time, so a fully elapsed
    /// TTL means the entry is immediately treated as absent.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// Returns a zero Duration once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            Duration::from_millis(expires.saturating_sub(now))
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
