//! Backend Module
//!
//! Contracts for the external stores the persistent and remote tiers are
//! built on, plus a filesystem-backed key-value store.

mod kv;
mod object;

// Re-export public types
pub use kv::{FsKvStore, KeyValueStore, KvError};
pub use object::{FileMetadata, FilePayload, FileView, ObjectError, ObjectStorage};
