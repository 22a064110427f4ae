//! Shared Cache - a pluggable multi-tier cache library
//!
//! Provides a uniform cache-adapter contract with three backends (memory
//! LRU, persistent local store, remote object storage), content-addressed
//! key derivation, and TTL expiration with lazy expiry.

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod tiers;
pub mod value;

pub use adapter::{CacheAdapter, SetOptions};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use keys::{build_cache_key, normalize_language_code, normalize_text, secure_hash, KeyParams};
pub use tiers::{MemoryCache, PersistentCache, RemoteCache};
pub use value::CacheValue;
