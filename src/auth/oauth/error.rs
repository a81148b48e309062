//! OAuth-specific error types for the Genuka integration layer.
//!
//! This module contains error types for the callback and refresh flows:
//! parameter validation, signature verification, token exchange, provider
//! profile fetch, and company persistence failures.
//!
//! # Example
//!
//! ```rust
//! use genuka_oauth::auth::oauth::OAuthError;
//!
//! let error = OAuthError::InvalidSignature;
//! assert_eq!(error.to_string(), "Callback signature verification failed");
//! ```

use crate::company::StoreError;
use thiserror::Error;

/// Errors that can occur during OAuth callback and refresh processing.
///
/// Verification failures fail closed: the orchestrators stop at the first
/// failing gate and surface the typed cause. [`OAuthError::InvalidSignature`]
/// deliberately does not reveal whether the HMAC or the timestamp check
/// failed.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A required callback parameter is missing or empty.
    #[error("Missing required callback parameter: '{name}'")]
    MissingParameter {
        /// The name of the missing parameter.
        name: &'static str,
    },

    /// A callback parameter is present but malformed.
    #[error("Invalid callback parameter '{name}': {reason}")]
    InvalidParameter {
        /// The name of the malformed parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Callback signature verification failed.
    ///
    /// Either the HMAC did not match or the timestamp fell outside the
    /// replay window. The two cases are intentionally indistinguishable
    /// to callers.
    #[error("Callback signature verification failed")]
    InvalidSignature,

    /// Token exchange request failed.
    ///
    /// The POST to the provider's token endpoint returned a non-success
    /// status, an unreadable body, or a body without an `access_token`.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned (0 for transport errors).
        status: u16,
        /// The error message or response body.
        message: String,
    },

    /// Company profile fetch failed.
    ///
    /// The GET to the provider's company endpoint returned a non-success
    /// status or a malformed body.
    #[error("Company profile fetch failed with status {status}: {message}")]
    ProfileFetchFailed {
        /// The HTTP status code returned (0 for transport errors).
        status: u16,
        /// The error message or response body.
        message: String,
    },

    /// Token refresh request failed.
    ///
    /// The POST to the provider's refresh endpoint returned a non-success
    /// status or a malformed body. The refresh flow never retries; callers
    /// should instruct the tenant to reinstall.
    #[error("Token refresh failed with status {status}: {message}")]
    TokenRefreshFailed {
        /// The HTTP status code returned (0 for transport errors).
        status: u16,
        /// The error message or response body.
        message: String,
    },

    /// No company exists for the identifier carried by a verified token.
    #[error("Company '{company_id}' not found")]
    CompanyNotFound {
        /// The company identifier that failed to resolve.
        company_id: String,
    },

    /// The stored refresh credential is empty; the tenant must reinstall.
    #[error("Company '{company_id}' has no stored refresh token")]
    NoRefreshToken {
        /// The company identifier.
        company_id: String,
    },

    /// A company store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
