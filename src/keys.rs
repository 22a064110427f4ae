//! Hashing & Key Derivation Module
//!
//! Turns a structured cache request into a single deterministic string key,
//! and provides the secure-hash primitive the other modules build on.
//!
//! Two semantically identical requests always produce the same key; the
//! text segment is a truncated SHA-256 digest of the normalized text, so
//! distinct texts keep cryptographic collision resistance.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

// == Public Constants ==
/// Sentinel language code for an absent or blank locale tag
pub const UNDETERMINED_LANG: &str = "und";

/// Maximum length of a normalized language code
pub const MAX_LANG_LEN: usize = 5;

/// Number of hex characters kept from the text digest in a cache key
pub const TEXT_HASH_LEN: usize = 32;

// == Secure Hash ==
/// Computes the SHA-256 digest of the input as a lowercase hex string.
///
/// Deterministic: the same input always yields the same output. Used both
/// for hashing key text and for deriving safe storage identifiers.
pub fn secure_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

// == Text Normalization ==
/// Canonicalizes human-entered text before hashing.
///
/// Applies Unicode NFC composition, trims, and collapses internal
/// whitespace runs to a single space. Caching keyed on human input must
/// not treat "Hello   world" and "Hello world" (or differently-composed
/// accented characters) as distinct entries.
///
/// Idempotent: normalizing already-normalized text is a no-op.
pub fn normalize_text(input: &str) -> String {
    let composed: String = input.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

// == Language Code Normalization ==
/// Collapses a locale tag to one canonical form for key stability.
///
/// Lowercases and truncates to [`MAX_LANG_LEN`] characters. Returns the
/// [`UNDETERMINED_LANG`] sentinel when the input is absent or blank.
pub fn normalize_language_code(input: Option<&str>) -> String {
    match input {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().to_lowercase().chars().take(MAX_LANG_LEN).collect()
        }
        _ => UNDETERMINED_LANG.to_string(),
    }
}

// == Key Parameters ==
/// Structured parameter set a cache key is derived from.
///
/// Only `namespace` is required. The `extra` map uses a BTreeMap so its
/// rendering is key-sorted by construction; unordered map iteration can
/// never cause two identical requests to produce different keys.
#[derive(Debug, Clone, Default)]
pub struct KeyParams {
    /// Logical grouping, e.g. "tts" or "image"
    pub namespace: String,
    /// Locale tag, normalized via [`normalize_language_code`]
    pub lang: Option<String>,
    /// Voice identifier (TTS)
    pub voice: Option<String>,
    /// Playback speed rendered by the caller, e.g. "1.0"
    pub speed: Option<String>,
    /// Free-form variant discriminator
    pub variant: Option<String>,
    /// Human-entered text, hashed after normalization
    pub text: Option<String>,
    /// Upstream identifier when the artifact has one
    pub external_id: Option<String>,
    /// Additional discriminating parameters
    pub extra: BTreeMap<String, String>,
}

// == Build Cache Key ==
/// Constructs a deterministic cache key from a parameter set.
///
/// The key is built as ordered colon-joined segments:
/// `namespace[:lang][:voice][:speed][:variant][:external_id]`, followed by
/// the first [`TEXT_HASH_LEN`] hex characters of the normalized text's
/// digest when text is present, followed by a parenthesized key-sorted
/// `k=v|k=v` rendering of any `extra` entries.
///
/// There are no error conditions: every input is coerced to a safe
/// default, and an entirely empty parameter set still yields a valid key.
pub fn build_cache_key(params: &KeyParams) -> String {
    let mut segments: Vec<String> = vec![params.namespace.clone()];

    if let Some(lang) = params.lang.as_deref() {
        segments.push(normalize_language_code(Some(lang)));
    }
    if let Some(voice) = params.voice.as_deref() {
        segments.push(voice.to_string());
    }
    if let Some(speed) = params.speed.as_deref() {
        segments.push(speed.to_string());
    }
    if let Some(variant) = params.variant.as_deref() {
        segments.push(variant.to_string());
    }
    if let Some(external_id) = params.external_id.as_deref() {
        segments.push(external_id.to_string());
    }

    if let Some(text) = params.text.as_deref() {
        let digest = secure_hash(&normalize_text(text));
        segments.push(digest[..TEXT_HASH_LEN].to_string());
    }

    if !params.extra.is_empty() {
        let rendered: Vec<String> = params
            .extra
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        segments.push(format!("({})", rendered.join("|")));
    }

    segments.join(":")
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_hash_deterministic() {
        let a = secure_hash("bonjour");
        let b = secure_hash("bonjour");
        assert_eq!(a, b);
        // SHA-256 is 32 bytes, 64 hex chars
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_secure_hash_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            secure_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("Hello   world"), "Hello world");
        assert_eq!(normalize_text("  Hello \t world \n"), "Hello world");
    }

    #[test]
    fn test_normalize_text_composes_accents() {
        // "é" as 'e' + combining acute vs precomposed U+00E9
        let decomposed = "Cafe\u{0301}";
        let composed = "Caf\u{00e9}";
        assert_eq!(normalize_text(decomposed), normalize_text(composed));
    }

    #[test]
    fn test_normalize_text_idempotent() {
        let samples = ["  a  b ", "Caf\u{0301}e", "déjà   vu", ""];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn test_normalize_language_code() {
        assert_eq!(normalize_language_code(Some("FR")), "fr");
        assert_eq!(normalize_language_code(Some("en-US-extra")), "en-us");
        assert_eq!(normalize_language_code(Some("  pt-BR ")), "pt-br");
        assert_eq!(normalize_language_code(None), UNDETERMINED_LANG);
        assert_eq!(normalize_language_code(Some("   ")), UNDETERMINED_LANG);
    }

    #[test]
    fn test_build_key_segment_order() {
        let params = KeyParams {
            namespace: "tts".to_string(),
            lang: Some("FR".to_string()),
            voice: Some("Rachel".to_string()),
            speed: Some("1.0".to_string()),
            ..Default::default()
        };
        let key = build_cache_key(&params);
        assert!(key.starts_with("tts:fr:Rachel:1.0"));
    }

    #[test]
    fn test_build_key_text_hash_is_truncated() {
        let params = KeyParams {
            namespace: "tts".to_string(),
            text: Some("Bonjour le monde".to_string()),
            ..Default::default()
        };
        let key = build_cache_key(&params);
        let hash_segment = key.split(':').nth(1).unwrap();
        assert_eq!(hash_segment.len(), TEXT_HASH_LEN);
    }

    #[test]
    fn test_build_key_normalization_equivalence() {
        // Different casing and extra whitespace must produce the same key
        let first = build_cache_key(&KeyParams {
            namespace: "tts".to_string(),
            lang: Some("FR".to_string()),
            voice: Some("Rachel".to_string()),
            text: Some("Bonjour le monde".to_string()),
            ..Default::default()
        });
        let second = build_cache_key(&KeyParams {
            namespace: "tts".to_string(),
            lang: Some("fr".to_string()),
            voice: Some("Rachel".to_string()),
            text: Some("Bonjour   le    monde".to_string()),
            ..Default::default()
        });
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_key_extra_is_sorted() {
        let mut forward = KeyParams {
            namespace: "img".to_string(),
            ..Default::default()
        };
        forward.extra.insert("width".to_string(), "640".to_string());
        forward.extra.insert("format".to_string(), "webp".to_string());

        let mut reversed = KeyParams {
            namespace: "img".to_string(),
            ..Default::default()
        };
        reversed.extra.insert("format".to_string(), "webp".to_string());
        reversed.extra.insert("width".to_string(), "640".to_string());

        let key = build_cache_key(&forward);
        assert_eq!(key, build_cache_key(&reversed));
        assert!(key.ends_with(":(format=webp|width=640)"));
    }

    #[test]
    fn test_build_key_empty_params() {
        let key = build_cache_key(&KeyParams::default());
        assert_eq!(key, "");

        let named = build_cache_key(&KeyParams {
            namespace: "audio".to_string(),
            ..Default::default()
        });
        assert_eq!(named, "audio");
    }

    #[test]
    fn test_build_key_distinct_texts_differ() {
        let base = KeyParams {
            namespace: "tts".to_string(),
            ..Default::default()
        };
        let a = build_cache_key(&KeyParams {
            text: Some("first".to_string()),
            ..base.clone()
        });
        let b = build_cache_key(&KeyParams {
            text: Some("second".to_string()),
            ..base
        });
        assert_ne!(a, b);
    }
}
