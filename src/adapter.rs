//! Cache Adapter Interface
//!
//! The uniform contract every cache backend implements, so callers can be
//! backend-agnostic and probe tiers in whatever order suits them.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::value::CacheValue;

// == Set Options ==
/// Optional parameters accepted by every adapter's `set`.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Time-to-live; absence falls back to the tier's default policy
    /// (memory tier applies its default TTL, persistent and remote tiers
    /// store without expiry)
    pub ttl: Option<Duration>,
    /// MIME-type hint, used when the value itself carries none
    pub content_type: Option<String>,
    /// Remote tier only: mark the stored file world-readable
    pub public_read: bool,
}

impl SetOptions {
    /// Options with only a TTL set.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Default::default()
        }
    }
}

// == Cache Adapter Trait ==
/// Capability contract satisfied by every cache backend.
///
/// Misses are values, not errors: `get` returns `None` and `has` returns
/// `false` for absent, expired, or unreachable entries. `set` errs only on
/// hard failures (construction misuse is caught earlier; the persistent
/// tier propagates non-quota store errors). `delete` is idempotent.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Name used exclusively for log attribution.
    fn name(&self) -> &str;

    /// Retrieves a value, or `None` on any kind of miss.
    async fn get(&self, key: &str) -> Option<CacheValue>;

    /// Stores a value, fully replacing any previous entry for the key.
    async fn set(&self, key: &str, value: CacheValue, opts: SetOptions) -> Result<()>;

    /// Removes an entry. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str);

    /// Reports whether an unexpired entry exists for the key.
    async fn has(&self, key: &str) -> bool;

    /// Signals a tier that has self-disabled and should be skipped by
    /// orchestration logic without raising.
    fn is_disabled(&self) -> bool {
        false
    }
}
