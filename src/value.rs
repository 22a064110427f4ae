//! Cache Value Module
//!
//! Defines the shapes a cache entry's value can take.
//!
//! The tiers branch on one closed sum type instead of inspecting runtime
//! value shapes: binary payloads, plain text, and structured JSON each get
//! an explicit variant, constructed once at the boundary by the caller.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// == Default Content Types ==
/// Content type assumed for binary payloads without an explicit hint
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type used for text payloads in the remote tier
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Content type used for structured payloads in the remote tier
pub const APPLICATION_JSON: &str = "application/json";

// == Cache Value ==
/// A value stored in, or retrieved from, a cache tier.
///
/// Serializes with an adjacent `kind`/`value` tag so persisted envelopes
/// survive round-trips without shape loss. Binary data is base64-encoded
/// inside JSON envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CacheValue {
    /// Raw binary payload (generated audio, optimized images)
    Bytes {
        #[serde(with = "base64_bytes")]
        data: Bytes,
        /// MIME-type hint, preserved across storage and retrieval
        content_type: Option<String>,
    },
    /// UTF-8 text
    Text(String),
    /// Arbitrary serializable object
    Structured(serde_json::Value),
}

impl CacheValue {
    /// Wraps a binary payload without a content-type hint.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        CacheValue::Bytes {
            data: data.into(),
            content_type: None,
        }
    }

    /// Wraps a binary payload with its MIME type.
    pub fn bytes_with_type(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        CacheValue::Bytes {
            data: data.into(),
            content_type: Some(content_type.into()),
        }
    }

    /// Wraps a text payload.
    pub fn text(value: impl Into<String>) -> Self {
        CacheValue::Text(value.into())
    }

    /// Wraps a structured payload.
    pub fn structured(value: serde_json::Value) -> Self {
        CacheValue::Structured(value)
    }

    /// Returns the content-type hint carried by the value itself, if any.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            CacheValue::Bytes { content_type, .. } => content_type.as_deref(),
            _ => None,
        }
    }
}

// == Base64 Serde Helper ==
/// Serializes `Bytes` as standard base64 inside JSON envelopes.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
