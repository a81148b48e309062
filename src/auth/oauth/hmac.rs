//! HMAC validation for Genuka OAuth callbacks and webhook verification.
//!
//! This module provides functions for computing and validating HMAC-SHA256
//! signatures used in Genuka's OAuth callback verification and webhook
//! signature validation.
//!
//! # Canonicalization
//!
//! Callback signatures are computed over a canonical message built by sorting
//! the parameter keys lexicographically and form-encoding the sorted pairs
//! into a single query string. Values that are already percent-encoded are
//! encoded again; this double-encoding matches the provider's own signing
//! construction and must be preserved exactly for signatures to interoperate.
//!
//! # Security
//!
//! All HMAC comparisons use constant-time comparison to prevent timing attacks.
//! Timestamp freshness is checked separately with a ±300 second replay window.
//!
//! # Example
//!
//! ```rust
//! use genuka_oauth::auth::oauth::hmac::{compute_signature, canonical_message, verify_signature};
//!
//! let params = [
//!     ("code".to_string(), "abc123".to_string()),
//!     ("company_id".to_string(), "01JD5GAZ8M".to_string()),
//! ];
//! let message = canonical_message(&params);
//! assert_eq!(message, "code=abc123&company_id=01JD5GAZ8M");
//!
//! let signature = compute_signature(&message, "my-secret");
//! assert!(verify_signature(&params, &signature, "my-secret"));
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Replay window for callback timestamps, in seconds.
///
/// A callback whose timestamp differs from the current time by more than
/// this value in either direction is rejected.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Computes an HMAC-SHA256 signature for the given message.
///
/// The signature is returned as a lowercase hexadecimal string, matching
/// the format the provider produces for callback and webhook signatures.
///
/// # Arguments
///
/// * `message` - The message to sign (typically a canonical query string)
/// * `secret` - The shared secret (OAuth client secret)
///
/// # Returns
///
/// A lowercase hex-encoded HMAC-SHA256 signature.
///
/// # Example
///
/// ```rust
/// use genuka_oauth::auth::oauth::hmac::compute_signature;
///
/// let sig = compute_signature("test-message", "secret-key");
/// assert_eq!(sig.len(), 64); // SHA256 produces 32 bytes = 64 hex chars
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    compute_signature_bytes(message.as_bytes(), secret)
}

/// Computes an HMAC-SHA256 signature for raw bytes.
///
/// This function is used for webhook signature verification, where the
/// provider signs the raw request body. It accepts bytes (not strings) to
/// preserve the exact payload without UTF-8 interpretation.
///
/// # Returns
///
/// A lowercase hex-encoded HMAC-SHA256 signature.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature_bytes(message: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// This function is used for security-sensitive comparisons like HMAC
/// verification to prevent timing attacks.
///
/// # Returns
///
/// `true` if the strings are equal, `false` otherwise.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // ConstantTimeEq handles different lengths securely
    a_bytes.ct_eq(b_bytes).into()
}

/// Builds the canonical message for a set of callback parameters.
///
/// The parameters are sorted by key lexicographically, then each key and
/// value is percent-encoded and the pairs are joined into a query string.
/// Values that arrived percent-encoded (the `redirect_to` target in
/// particular) are encoded again; the provider signs the same
/// double-encoded form, so this must not be "corrected".
#[must_use]
pub fn canonical_message(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validates an HMAC signature over a set of callback parameters.
///
/// The expected signature is computed from the canonical message (see
/// [`canonical_message`]) and compared against the supplied signature in
/// constant time.
///
/// # Arguments
///
/// * `params` - The callback parameters, excluding the `hmac` parameter itself
/// * `signature` - The hex signature received in the callback
/// * `secret` - The shared secret (OAuth client secret)
///
/// # Returns
///
/// `true` if the signature is valid, `false` otherwise. This function never
/// errors; the caller decides whether a mismatch is fatal.
#[must_use]
pub fn verify_signature(params: &[(String, String)], signature: &str, secret: &str) -> bool {
    let message = canonical_message(params);
    let computed = compute_signature(&message, secret);
    constant_time_compare(&computed, signature)
}

/// Validates callback timestamp freshness.
///
/// Accepts the timestamp when `|now - timestamp| <= 300` seconds and rejects
/// it otherwise. A timestamp that does not parse as an integer is rejected
/// (fails closed).
///
/// # Arguments
///
/// * `timestamp` - The `timestamp` parameter as received (decimal seconds)
/// * `now` - The current Unix time in seconds
///
/// # Example
///
/// ```rust
/// use genuka_oauth::auth::oauth::hmac::verify_timestamp;
///
/// assert!(verify_timestamp("1700000000", 1_700_000_300));
/// assert!(!verify_timestamp("1700000000", 1_700_000_301));
/// ```
#[must_use]
pub fn verify_timestamp(timestamp: &str, now: i64) -> bool {
    let Ok(request_time) = timestamp.parse::<i64>() else {
        return false;
    };

    (now - request_time).abs() <= TIMESTAMP_TOLERANCE_SECS
}

// Internal hex encoding since we don't want to add another dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_compute_signature_produces_correct_hex() {
        let sig = compute_signature("test", "secret");

        // Should be 64 characters (32 bytes * 2 hex chars)
        assert_eq!(sig.len(), 64);
        // Should be lowercase hex
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(sig.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_compute_signature_matches_known_value() {
        // Known HMAC-SHA256 test vector
        // HMAC-SHA256("message", "key") = 6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a
        let sig = compute_signature("message", "key");
        assert_eq!(
            sig,
            "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a"
        );
    }

    #[test]
    fn test_compute_signature_bytes_matches_string_variant() {
        assert_eq!(
            compute_signature("payload", "secret"),
            compute_signature_bytes(b"payload", "secret")
        );
    }

    #[test]
    fn test_constant_time_compare_equal_strings() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_different_strings() {
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(!constant_time_compare("ABC", "abc"));
    }

    #[test]
    fn test_canonical_message_sorts_keys() {
        let params = pairs(&[
            ("timestamp", "1700000000"),
            ("code", "abc"),
            ("company_id", "C1"),
        ]);

        assert_eq!(
            canonical_message(&params),
            "code=abc&company_id=C1&timestamp=1700000000"
        );
    }

    #[test]
    fn test_canonical_message_double_encodes_encoded_values() {
        // redirect_to arrives percent-encoded and is encoded again; the
        // provider signs the same double-encoded form.
        let params = pairs(&[("redirect_to", "https%3A%2F%2Fapp.example.com%2Fdone")]);

        assert_eq!(
            canonical_message(&params),
            "redirect_to=https%253A%252F%252Fapp.example.com%252Fdone"
        );
    }

    #[test]
    fn test_verify_signature_round_trip() {
        let params = pairs(&[
            ("code", "abc123"),
            ("company_id", "01JD5GAZ8M"),
            ("timestamp", "1700000000"),
            ("redirect_to", "https%3A%2F%2Fapp.example.com"),
        ]);
        let message = canonical_message(&params);
        let signature = compute_signature(&message, "test-secret");

        assert!(verify_signature(&params, &signature, "test-secret"));
    }

    #[test]
    fn test_verify_signature_rejects_single_character_mutation() {
        let params = pairs(&[
            ("code", "abc123"),
            ("company_id", "01JD5GAZ8M"),
            ("timestamp", "1700000000"),
        ]);
        let signature = compute_signature(&canonical_message(&params), "test-secret");

        let mutated = pairs(&[
            ("code", "abc124"), // one character changed
            ("company_id", "01JD5GAZ8M"),
            ("timestamp", "1700000000"),
        ]);

        assert!(!verify_signature(&mutated, &signature, "test-secret"));
    }

    #[test]
    fn test_verify_signature_rejects_wrong_secret() {
        let params = pairs(&[("code", "abc")]);
        let signature = compute_signature(&canonical_message(&params), "secret-1");

        assert!(!verify_signature(&params, &signature, "secret-2"));
    }

    #[test]
    fn test_verify_signature_is_order_insensitive() {
        let signature = {
            let params = pairs(&[("a", "1"), ("b", "2")]);
            compute_signature(&canonical_message(&params), "s")
        };

        // Same parameters in reverse arrival order produce the same canonical message
        let reversed = pairs(&[("b", "2"), ("a", "1")]);
        assert!(verify_signature(&reversed, &signature, "s"));
    }

    #[test]
    fn test_verify_timestamp_accepts_fresh() {
        assert!(verify_timestamp("1700000000", 1_700_000_000));
        assert!(verify_timestamp("1700000000", 1_700_000_150));
    }

    #[test]
    fn test_verify_timestamp_boundary_at_exactly_300() {
        // 300 seconds of skew in either direction is still accepted
        assert!(verify_timestamp("1700000000", 1_700_000_300));
        assert!(verify_timestamp("1700000300", 1_700_000_000));
    }

    #[test]
    fn test_verify_timestamp_rejects_at_301() {
        assert!(!verify_timestamp("1700000000", 1_700_000_301));
        assert!(!verify_timestamp("1700000301", 1_700_000_000));
    }

    #[test]
    fn test_verify_timestamp_rejects_unparseable() {
        assert!(!verify_timestamp("not-a-number", 1_700_000_000));
        assert!(!verify_timestamp("", 1_700_000_000));
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(hex::encode([0x00, 0xff, 0xab, 0xcd]), "00ffabcd");
        assert_eq!(hex::encode([]), "");
        assert_eq!(hex::encode([0x12, 0x34]), "1234");
    }
}
