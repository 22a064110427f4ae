//! Key-Value Store Backend
//!
//! Contract for the durable local store the persistent tier wraps, and a
//! filesystem-backed implementation of it.
//!
//! The store speaks raw bytes and flat string keys; envelope wrapping and
//! TTL bookkeeping live in the tier above.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs;

use crate::keys::secure_hash;

// == KV Error Enum ==
/// Failure modes of a key-value store backend.
///
/// `QuotaExceeded` is the one soft condition: the persistent tier reacts
/// to it by disabling itself instead of failing the caller. Everything
/// else is a hard failure.
#[derive(Error, Debug)]
pub enum KvError {
    /// The store is out of space
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// Underlying I/O failure
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// Backend-specific failure
    #[error("Backend failure: {0}")]
    Backend(String),
}

// == Key-Value Store Trait ==
/// Durable per-client key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads an item, or `None` when the key is absent.
    async fn get_item(&self, key: &str) -> Result<Option<Bytes>, KvError>;

    /// Writes an item, overwriting any previous value.
    async fn set_item(&self, key: &str, value: Bytes) -> Result<(), KvError>;

    /// Removes an item. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), KvError>;

    /// Wipes the entire store.
    async fn clear(&self) -> Result<(), KvError>;
}

// == Filesystem Store ==
/// Filesystem-backed [`KeyValueStore`], one file per item.
///
/// File names are the SHA-256 digest of the storage key, so arbitrary key
/// strings never leak into the filesystem namespace.
#[derive(Debug, Clone)]
pub struct FsKvStore {
    root: PathBuf,
}

impl FsKvStore {
    /// Creates a store rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.bin", secure_hash(key)))
    }
}

/// Maps an I/O error to the store taxonomy. ENOSPC and EDQUOT both mean
/// the device or quota is full.
fn classify_io(err: io::Error) -> KvError {
    match err.raw_os_error() {
        Some(28) | Some(122) => KvError::QuotaExceeded,
        _ => KvError::Io(err),
    }
}

#[async_trait]
impl KeyValueStore for FsKvStore {
    async fn get_item(&self, key: &str) -> Result<Option<Bytes>, KvError> {
        match fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(classify_io(err)),
        }
    }

    async fn set_item(&self, key: &str, value: Bytes) -> Result<(), KvError> {
        fs::create_dir_all(&self.root).await.map_err(classify_io)?;
        fs::write(self.path_for(key), &value)
            .await
            .map_err(classify_io)
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(classify_io(err)),
        }
    }

    async fn clear(&self) -> Result<(), KvError> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(classify_io(err)),
        }
    }
}
