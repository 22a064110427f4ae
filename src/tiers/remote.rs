//! Remote Object-Storage Tier Module
//!
//! Maps the cache-adapter contract onto a remote blob store so cached
//! artifacts (generated audio, optimized images) can be shared across
//! clients and sessions.
//!
//! The remote tier makes no distinction between "definitely absent" and
//! "unreachable": both degrade to a miss. Callers already regenerate on
//! miss, so a transient partition costs hit rate, not correctness.

use async_trait::async_trait;
use bytes::Bytes;

use crate::adapter::{CacheAdapter, SetOptions};
use crate::backend::{FilePayload, FileView, ObjectStorage};
use crate::error::{CacheError, Result};
use crate::keys::secure_hash;
use crate::logging::{log_cache_event, log_soft_failure, CacheOp};
use crate::value::{CacheValue, APPLICATION_JSON, OCTET_STREAM, TEXT_PLAIN};

const ADAPTER_NAME: &str = "remote";

// == File Id Constants ==
/// Maximum length of a derived file id
pub const MAX_FILE_ID_LEN: usize = 120;

/// Sanitized ids shorter than this are replaced by a hash-derived id.
/// Tunable; the exact bound is not load-bearing.
pub const MIN_FILE_ID_LEN: usize = 10;

/// Prefix marking hash-derived file ids
const HASHED_ID_PREFIX: &str = "ck_";

// == Safe File Id ==
/// Derives a storage-safe file id from a free-form cache key.
///
/// Characters outside `[A-Za-z0-9._-]` are replaced and the result is
/// truncated to [`MAX_FILE_ID_LEN`]. Sanitized ids too short to be a
/// meaningful identifier fall back to a tagged hash of the original key,
/// which keeps ids both length-safe and hard to collide.
pub fn safe_file_id(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_ID_LEN)
        .collect();

    if sanitized.len() < MIN_FILE_ID_LEN {
        format!("{}{}", HASHED_ID_PREFIX, &secure_hash(key)[..32])
    } else {
        sanitized
    }
}

// == Payload Shaping ==
/// Serializes a value into an upload payload and its content type.
///
/// Returns None when a structured value cannot be serialized; the caller
/// logs and skips the write.
fn encode_payload(value: CacheValue, opts: &SetOptions) -> Option<(Bytes, String)> {
    match value {
        CacheValue::Bytes { data, content_type } => {
            let ct = opts
                .content_type
                .clone()
                .or(content_type)
                .unwrap_or_else(|| OCTET_STREAM.to_string());
            Some((data, ct))
        }
        CacheValue::Text(text) => {
            let ct = opts
                .content_type
                .clone()
                .unwrap_or_else(|| TEXT_PLAIN.to_string());
            Some((Bytes::from(text), ct))
        }
        CacheValue::Structured(json) => {
            let raw = serde_json::to_vec(&json).ok()?;
            Some((Bytes::from(raw), APPLICATION_JSON.to_string()))
        }
    }
}

/// Rebuilds a value from a downloaded payload, keyed on the recorded
/// content type. An undecodable payload is a miss, not an error.
fn decode_view(view: FileView) -> Option<CacheValue> {
    let content_type = view.content_type.as_deref().unwrap_or(OCTET_STREAM);

    if content_type.starts_with(APPLICATION_JSON) {
        serde_json::from_slice(&view.data)
            .ok()
            .map(CacheValue::Structured)
    } else if content_type.starts_with("text/") {
        String::from_utf8(view.data.to_vec())
            .ok()
            .map(CacheValue::Text)
    } else {
        Some(CacheValue::Bytes {
            data: view.data,
            content_type: view.content_type,
        })
    }
}

// == Remote Cache ==
/// Cache tier over an [`ObjectStorage`] bucket.
pub struct RemoteCache<C: ObjectStorage> {
    storage: C,
    bucket_id: String,
}

impl<C: ObjectStorage> RemoteCache<C> {
    // == Constructor ==
    /// Creates a remote tier bound to a bucket.
    ///
    /// A blank bucket id is caller misuse and fails loudly.
    pub fn new(storage: C, bucket_id: impl Into<String>) -> Result<Self> {
        let bucket_id = bucket_id.into();
        if bucket_id.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "remote cache requires a bucket id".to_string(),
            ));
        }
        Ok(Self { storage, bucket_id })
    }

    /// The bucket this tier reads and writes.
    pub fn bucket_id(&self) -> &str {
        &self.bucket_id
    }
}

// == Adapter Implementation ==
#[async_trait]
impl<C: ObjectStorage> CacheAdapter for RemoteCache<C> {
    fn name(&self) -> &str {
        ADAPTER_NAME
    }

    async fn get(&self, key: &str) -> Option<CacheValue> {
        let file_id = safe_file_id(key);

        let value = match self.storage.get_file_view(&self.bucket_id, &file_id).await {
            Ok(view) => decode_view(view),
            // Not-found, network, permission: all uniformly a miss
            Err(_) => None,
        };

        let op = if value.is_some() {
            CacheOp::Hit
        } else {
            CacheOp::Miss
        };
        log_cache_event(ADAPTER_NAME, op, key);
        value
    }

    async fn set(&self, key: &str, value: CacheValue, opts: SetOptions) -> Result<()> {
        let Some((data, content_type)) = encode_payload(value, &opts) else {
            log_soft_failure(ADAPTER_NAME, "set", key, "unserializable value");
            return Ok(());
        };

        let payload = FilePayload {
            data,
            content_type: Some(content_type),
            public_read: opts.public_read,
        };

        let file_id = safe_file_id(key);
        match self.storage.create_file(&self.bucket_id, &file_id, payload).await {
            Ok(()) => log_cache_event(ADAPTER_NAME, CacheOp::Set, key),
            // Population failures must not break the caller's primary path
            Err(err) => log_soft_failure(ADAPTER_NAME, "set", key, &err.to_string()),
        }
        Ok(())
    }

    async fn delete(&self, key: &str) {
        let file_id = safe_file_id(key);
        let _ = self.storage.delete_file(&self.bucket_id, &file_id).await;
        log_cache_event(ADAPTER_NAME, CacheOp::Delete, key);
    }

    async fn has(&self, key: &str) -> bool {
        let file_id = safe_file_id(key);
        self.storage.get_file(&self.bucket_id, &file_id).await.is_ok()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_id_passthrough() {
        assert_eq!(safe_file_id("tts_fr_Rachel-1.0_abcdef"), "tts_fr_Rachel-1.0_abcdef");
    }

    #[test]
    fn test_safe_file_id_replaces_illegal_chars() {
        assert_eq!(safe_file_id("tts:fr:Rachel/1.0"), "tts_fr_Rachel_1.0");
    }

    #[test]
    fn test_safe_file_id_truncates_long_keys() {
        let long_key = "k".repeat(500);
        assert_eq!(safe_file_id(&long_key).len(), MAX_FILE_ID_LEN);
    }

    #[test]
    fn test_safe_file_id_hash_fallback_for_short_ids() {
        let id = safe_file_id("a:b");
        assert!(id.starts_with(HASHED_ID_PREFIX));
        assert_eq!(id.len(), HASHED_ID_PREFIX.len() + 32);
        // Deterministic
        assert_eq!(id, safe_file_id("a:b"));
        // Distinct short keys map to distinct ids
        assert_ne!(id, safe_file_id("a:c"));
    }

    #[test]
    fn test_encode_text_payload() {
        let (data, ct) = encode_payload(CacheValue::text("bonjour"), &SetOptions::default()).unwrap();
        assert_eq!(&data[..], b"bonjour");
        assert_eq!(ct, TEXT_PLAIN);
    }

    #[test]
    fn test_encode_bytes_prefers_option_content_type() {
        let opts = SetOptions {
            content_type: Some("audio/ogg".to_string()),
            ..Default::default()
        };
        let value = CacheValue::bytes_with_type(vec![1u8, 2], "audio/mpeg");
        let (_, ct) = encode_payload(value, &opts).unwrap();
        assert_eq!(ct, "audio/ogg");
    }

    #[test]
    fn test_encode_bytes_defaults_to_octet_stream() {
        let (_, ct) = encode_payload(CacheValue::bytes(vec![1u8]), &SetOptions::default()).unwrap();
        assert_eq!(ct, OCTET_STREAM);
    }

    #[test]
    fn test_decode_roundtrips_each_shape() {
        let structured = serde_json::json!({"a": 1});
        let encoded = encode_payload(
            CacheValue::Structured(structured.clone()),
            &SetOptions::default(),
        )
        .unwrap();
        let decoded = decode_view(FileView {
            data: encoded.0,
            content_type: Some(encoded.1),
        });
        assert_eq!(decoded, Some(CacheValue::Structured(structured)));

        let decoded = decode_view(FileView {
            data: Bytes::from_static(b"hello"),
            content_type: Some(TEXT_PLAIN.to_string()),
        });
        assert_eq!(decoded, Some(CacheValue::text("hello")));

        let decoded = decode_view(FileView {
            data: Bytes::from_static(&[0xff, 0xfe]),
            content_type: Some("audio/mpeg".to_string()),
        });
        assert_eq!(
            decoded,
            Some(CacheValue::bytes_with_type(vec![0xffu8, 0xfe], "audio/mpeg"))
        );
    }

    #[test]
    fn test_decode_corrupt_json_is_none() {
        let decoded = decode_view(FileView {
            data: Bytes::from_static(b"{not json"),
            content_type: Some(APPLICATION_JSON.to_string()),
        });
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_new_rejects_blank_bucket() {
        struct NoopStorage;

        #[async_trait]
        impl ObjectStorage for NoopStorage {
            async fn get_file_view(
                &self,
                _bucket_id: &str,
                _file_id: &str,
            ) -> std::result::Result<FileView, crate::backend::ObjectError> {
                unreachable!()
            }

            async fn create_file(
                &self,
                _bucket_id: &str,
                _file_id: &str,
                _payload: FilePayload,
            ) -> std::result::Result<(), crate::backend::ObjectError> {
                unreachable!()
            }

            async fn get_file(
                &self,
                _bucket_id: &str,
                _file_id: &str,
            ) -> std::result::Result<crate::backend::FileMetadata, crate::backend::ObjectError>
            {
                unreachable!()
            }

            async fn delete_file(
                &self,
                _bucket_id: &str,
                _file_id: &str,
            ) -> std::result::Result<(), crate::backend::ObjectError> {
                unreachable!()
            }
        }

        assert!(matches!(
            RemoteCache::new(NoopStorage, "  "),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(RemoteCache::new(NoopStorage, "bucket-1").is_ok());
    }
}
