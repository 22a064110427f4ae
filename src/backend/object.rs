//! Object Storage Backend
//!
//! Contract for the remote blob store the remote tier adapts. The method
//! shapes mirror the consumed storage API: file views for payload reads,
//! metadata fetches for existence probes, and explicit create/delete.
//!
//! No implementation lives here; consumers supply the real client.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

// == Object Error Enum ==
/// Failure modes of a remote object store.
///
/// The remote tier treats every variant identically (a miss on read, a
/// logged no-op on write); the taxonomy exists so backends can report
/// honestly and logs stay diagnosable.
#[derive(Error, Debug)]
pub enum ObjectError {
    /// No file exists under the given id
    #[error("File not found: {0}")]
    NotFound(String),

    /// Network or service failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The caller may not access the file
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

// == Payload & Metadata Types ==
/// Payload for a file creation.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub data: Bytes,
    /// MIME type recorded with the file
    pub content_type: Option<String>,
    /// Attach world-readable access metadata at creation
    pub public_read: bool,
}

/// A downloaded file with its recorded content type.
#[derive(Debug, Clone)]
pub struct FileView {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// File metadata, as returned by an existence probe.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub id: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
}

// == Object Storage Trait ==
/// Remote blob storage keyed by bucket and opaque file id.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Downloads a file's payload.
    async fn get_file_view(&self, bucket_id: &str, file_id: &str)
        -> Result<FileView, ObjectError>;

    /// Creates a file, overwriting any existing file under the same id.
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        payload: FilePayload,
    ) -> Result<(), ObjectError>;

    /// Fetches file metadata without downloading the payload.
    async fn get_file(&self, bucket_id: &str, file_id: &str)
        -> Result<FileMetadata, ObjectError>;

    /// Deletes a file.
    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), ObjectError>;
}
