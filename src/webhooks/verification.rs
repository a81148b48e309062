//! Webhook signature verification.
//!
//! The provider signs webhook deliveries with HMAC-SHA256 over the raw
//! request body, sent hex-encoded in the `X-Genuka-Signature` header.
//! Signature enforcement is optional by design: a missing header is
//! tolerated with a warning, while a present-but-wrong header is rejected.
//!
//! # Security
//!
//! All comparisons use constant-time comparison to prevent timing attacks.
//!
//! # Example
//!
//! ```rust
//! use genuka_oauth::auth::oauth::hmac::compute_signature_bytes;
//! use genuka_oauth::webhooks::verify_signature;
//!
//! let body = br#"{"type":"company.updated"}"#;
//! let signature = compute_signature_bytes(body, "my-secret");
//! assert!(verify_signature(body, &signature, "my-secret"));
//! ```

use crate::auth::oauth::hmac::{compute_signature_bytes, constant_time_compare};

/// HTTP header carrying the webhook signature.
pub const HEADER_SIGNATURE: &str = "X-Genuka-Signature";

/// Verifies a webhook signature over the raw request body.
///
/// The body must be the exact bytes as received; any re-serialization of
/// the JSON payload would change the signature.
///
/// # Returns
///
/// `true` if the hex signature matches, `false` otherwise.
#[must_use]
pub fn verify_signature(raw_body: &[u8], signature: &str, secret: &str) -> bool {
    let expected = compute_signature_bytes(raw_body, secret);
    constant_time_compare(&expected, signature)
}
