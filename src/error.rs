//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.
//!
//! Misses are never errors: adapters report them as `None`/`false`.
//! Errors are reserved for hard failures, i.e. caller misuse at
//! construction time, or a persistent-store write failing for a reason
//! other than quota exhaustion.

use thiserror::Error;

use crate::backend::KvError;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Malformed configuration at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Persistent store failed for a reason other than quota exhaustion
    #[error("Persistent store failure: {0}")]
    Store(#[source] KvError),

    /// A value could not be serialized for storage
    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
