//! At-rest token encryption seam.
//!
//! Stored access and refresh tokens pass through a [`TokenCipher`] before
//! reaching the [`CompanyStore`](crate::company::CompanyStore). The cipher
//! implementation is the embedder's: host platforms typically provide a
//! reversible cipher keyed by a process secret. This crate ships only
//! [`PlaintextCipher`], the passthrough used when
//! [`GenukaConfig::encrypt_tokens`](crate::GenukaConfig::encrypt_tokens)
//! is disabled and in tests.

use thiserror::Error;

/// Error raised when a stored token cannot be decrypted.
///
/// This usually means the process secret changed since the token was
/// written, or the stored value was corrupted.
#[derive(Debug, Error)]
#[error("Token decryption failed: {message}")]
pub struct CipherError {
    /// Cipher-specific failure description.
    pub message: String,
}

/// Reversible cipher for tokens at rest.
///
/// Encryption is infallible by contract (a cipher that cannot encrypt is
/// misconfigured and should panic at construction, not per call);
/// decryption is fallible because stored values may predate a key change.
pub trait TokenCipher: Send + Sync {
    /// Encrypts a plaintext token into its stored form.
    fn encrypt(&self, plaintext: &str) -> String;

    /// Decrypts a stored token back to plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError`] when the stored value cannot be reversed.
    fn decrypt(&self, stored: &str) -> Result<String, CipherError>;
}

/// Passthrough cipher: stores tokens verbatim.
///
/// Installed when token encryption at rest is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaintextCipher;

impl TokenCipher for PlaintextCipher {
    fn encrypt(&self, plaintext: &str) -> String {
        plaintext.to_string()
    }

    fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        Ok(stored.to_string())
    }
}
