//! Persistent Local Tier Module
//!
//! Durable client-local cache surviving process restarts, for values too
//! large or too valuable to keep only in memory. Entries are wrapped in a
//! JSON envelope with TTL metadata over a pluggable key-value store.
//!
//! Quota exhaustion is a soft condition: a full local store is not fatal
//! for an application whose correctness does not depend on caching, so
//! the tier disables itself instead of failing the caller.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapter::{CacheAdapter, SetOptions};
use crate::backend::{KeyValueStore, KvError};
use crate::error::{CacheError, Result};
use crate::logging::{log_cache_event, log_soft_failure, log_tier_disabled, CacheOp};
use crate::value::CacheValue;

const ADAPTER_NAME: &str = "persistent";

// == Tier State ==
/// Lifecycle of the tier within one process.
///
/// Transitioned to `Disabled` exactly once, on the first quota-exceeded
/// write, and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierState {
    Active,
    Disabled,
}

// == Persisted Envelope ==
/// On-store representation of one entry.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    value: CacheValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    /// Absolute expiry, epoch milliseconds; absent = no expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    stored_at: DateTime<Utc>,
}

impl PersistedEntry {
    fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => Utc::now().timestamp_millis() > exp,
            None => false,
        }
    }
}

// == Persistent Cache ==
/// Envelope-wrapped cache tier over a [`KeyValueStore`].
pub struct PersistentCache<S: KeyValueStore> {
    store: S,
    namespace: String,
    state: RwLock<TierState>,
}

impl<S: KeyValueStore> PersistentCache<S> {
    // == Constructor ==
    /// Creates a persistent tier over the given store; all storage keys
    /// are prefixed with the namespace.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            state: RwLock::new(TierState::Active),
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    fn state(&self) -> TierState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flips the tier to `Disabled`. Logs on the first transition only.
    fn disable(&self, reason: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if *state == TierState::Active {
            *state = TierState::Disabled;
            log_tier_disabled(ADAPTER_NAME, reason);
        }
    }

    /// Reads and validates the envelope for a key, lazily expiring it.
    ///
    /// Corrupt envelopes are deleted and reported as absent; read
    /// failures degrade to absent.
    async fn read_live_entry(&self, key: &str) -> Option<PersistedEntry> {
        let storage_key = self.storage_key(key);

        let raw = match self.store.get_item(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log_soft_failure(ADAPTER_NAME, "get", key, &err.to_string());
                return None;
            }
        };

        let entry: PersistedEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                log_soft_failure(ADAPTER_NAME, "get", key, &err.to_string());
                let _ = self.store.remove_item(&storage_key).await;
                return None;
            }
        };

        if entry.is_expired() {
            // First detected staleness removes the entry
            let _ = self.store.remove_item(&storage_key).await;
            return None;
        }

        Some(entry)
    }

    // == Clear ==
    /// Best-effort wipe of the entire store. Failures are logged, never
    /// thrown. Attempted even when the tier is disabled, since freeing
    /// space can only help.
    pub async fn clear(&self) {
        if let Err(err) = self.store.clear().await {
            log_soft_failure(ADAPTER_NAME, "clear", "*", &err.to_string());
        }
    }
}

// == Adapter Implementation ==
#[async_trait]
impl<S: KeyValueStore> CacheAdapter for PersistentCache<S> {
    fn name(&self) -> &str {
        ADAPTER_NAME
    }

    async fn get(&self, key: &str) -> Option<CacheValue> {
        if self.state() == TierState::Disabled {
            return None;
        }

        match self.read_live_entry(key).await {
            Some(entry) => {
                log_cache_event(ADAPTER_NAME, CacheOp::Hit, key);
                Some(entry.value)
            }
            None => {
                log_cache_event(ADAPTER_NAME, CacheOp::Miss, key);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: CacheValue, opts: SetOptions) -> Result<()> {
        if self.state() == TierState::Disabled {
            return Ok(());
        }

        let content_type = opts
            .content_type
            .clone()
            .or_else(|| value.content_type().map(str::to_string));
        let exp = opts
            .ttl
            .map(|ttl| Utc::now().timestamp_millis() + ttl.as_millis() as i64);

        let entry = PersistedEntry {
            value,
            content_type,
            exp,
            stored_at: Utc::now(),
        };
        let raw = serde_json::to_vec(&entry)?;

        match self.store.set_item(&self.storage_key(key), raw.into()).await {
            Ok(()) => {
                log_cache_event(ADAPTER_NAME, CacheOp::Set, key);
                Ok(())
            }
            Err(KvError::QuotaExceeded) => {
                self.disable("storage quota exceeded");
                Ok(())
            }
            // Only quota exhaustion is a soft condition; anything else
            // indicates a real fault and must surface
            Err(err) => Err(CacheError::Store(err)),
        }
    }

    async fn delete(&self, key: &str) {
        if self.state() == TierState::Disabled {
            return;
        }

        if let Err(err) = self.store.remove_item(&self.storage_key(key)).await {
            log_soft_failure(ADAPTER_NAME, "delete", key, &err.to_string());
        }
        log_cache_event(ADAPTER_NAME, CacheOp::Delete, key);
    }

    async fn has(&self, key: &str) -> bool {
        if self.state() == TierState::Disabled {
            return false;
        }

        self.read_live_entry(key).await.is_some()
    }

    fn is_disabled(&self) -> bool {
        self.state() == TierState::Disabled
    }
}
