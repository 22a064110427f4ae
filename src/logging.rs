//! Cache Event Logging Module
//!
//! Cross-cutting hit/miss/set/delete event emission used by all tiers
//! uniformly. Pure functions over primitive arguments: the logger knows
//! nothing about the tiers it logs for.

use tracing::{debug, warn};

// == Cache Operation ==
/// Outcome of a cache operation, for the uniform event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOp {
    Hit,
    Miss,
    Set,
    Delete,
}

impl CacheOp {
    /// Stable lowercase label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOp::Hit => "hit",
            CacheOp::Miss => "miss",
            CacheOp::Set => "set",
            CacheOp::Delete => "delete",
        }
    }
}

// == Event Emission ==
/// Emits one cache event on the uniform stream.
pub fn log_cache_event(adapter: &str, op: CacheOp, key: &str) {
    debug!(adapter, op = op.as_str(), key, "cache event");
}

/// Records a swallowed failure: the operation degraded to a miss or a
/// no-op instead of surfacing an error to the caller.
pub fn log_soft_failure(adapter: &str, op: &str, key: &str, reason: &str) {
    warn!(adapter, op, key, reason, "cache operation degraded");
}

/// Records a tier disabling itself for the remainder of the process.
pub fn log_tier_disabled(adapter: &str, reason: &str) {
    warn!(adapter, reason, "cache tier disabled");
}
