//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Genuka OAuth client id.
///
/// This newtype ensures the client id is non-empty and provides type safety
/// to prevent accidental misuse of raw strings.
///
/// # Example
///
/// ```rust
/// use genuka_oauth::ClientId;
///
/// let id = ClientId::new("my-client-id").unwrap();
/// assert_eq!(id.as_ref(), "my-client-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Genuka OAuth client secret.
///
/// This newtype ensures the secret is non-empty and masks its value
/// in debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)` instead of the actual key. The secret doubles as
/// the HMAC signing key and the JWT session signing key, so it must never
/// reach log output.
///
/// # Example
///
/// ```rust
/// use genuka_oauth::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated provider base URL.
///
/// This newtype validates that the URL has a proper format with a scheme
/// and normalizes away a trailing slash so endpoint paths can be appended
/// directly.
///
/// # Example
///
/// ```rust
/// use genuka_oauth::ProviderUrl;
///
/// let url = ProviderUrl::new("https://api.genuka.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.genuka.com");
/// assert_eq!(url.scheme(), "https");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderUrl {
    url: String,
    scheme_end: usize,
}

impl ProviderUrl {
    /// Creates a new validated provider URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProviderUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidProviderUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidProviderUrl { url: url.clone() });
        }

        let host_start = scheme_end + 3; // Skip "://"
        if host_start >= url.len() {
            return Err(ConfigError::InvalidProviderUrl { url: url.clone() });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Joins an endpoint path onto the base URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use genuka_oauth::ProviderUrl;
    ///
    /// let url = ProviderUrl::new("https://api.genuka.com").unwrap();
    /// assert_eq!(url.join("/oauth/token"), "https://api.genuka.com/oauth/token");
    /// ```
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

impl AsRef<str> for ProviderUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// A validated company identifier.
///
/// Company ids are assigned by the provider (ULID strings in practice) and
/// are immutable once issued. This crate never generates them locally; it
/// only validates that an id received from the provider or decoded from a
/// session token is non-empty and free of whitespace.
///
/// # Serialization
///
/// `CompanyId` serializes to and deserializes from a plain string:
///
/// ```rust
/// use genuka_oauth::CompanyId;
///
/// let id = CompanyId::new("01JD5GAZ8M2V4Q").unwrap();
/// let json = serde_json::to_string(&id).unwrap();
/// assert_eq!(json, r#""01JD5GAZ8M2V4Q""#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a new validated company id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCompanyId`] if the id is empty or
    /// contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidCompanyId { id });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CompanyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CompanyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_rejects_empty_string() {
        let result = ClientId::new("");
        assert!(matches!(result, Err(ConfigError::EmptyClientId)));
    }

    #[test]
    fn test_client_secret_masks_value_in_debug() {
        let secret = ClientSecret::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "ClientSecret(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_provider_url_trims_trailing_slash() {
        let url = ProviderUrl::new("https://api.genuka.com/").unwrap();
        assert_eq!(url.as_ref(), "https://api.genuka.com");
        assert_eq!(url.join("/oauth/token"), "https://api.genuka.com/oauth/token");
    }

    #[test]
    fn test_provider_url_accepts_localhost_with_port() {
        let url = ProviderUrl::new("http://localhost:3000").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.join("/oauth/refresh"), "http://localhost:3000/oauth/refresh");
    }

    #[test]
    fn test_provider_url_rejects_invalid() {
        // No scheme
        assert!(ProviderUrl::new("api.genuka.com").is_err());

        // Empty host
        assert!(ProviderUrl::new("https://").is_err());

        // Invalid scheme
        assert!(ProviderUrl::new("://example.com").is_err());
    }

    #[test]
    fn test_company_id_rejects_empty_and_whitespace() {
        assert!(CompanyId::new("").is_err());
        assert!(CompanyId::new("has space").is_err());
        assert!(CompanyId::new("01JD5GAZ8M2V4Q").is_ok());
    }

    #[test]
    fn test_company_id_round_trip_serialization() {
        let original = CompanyId::new("01JD5GAZ8M2V4Q").unwrap();
        let json = serde_json::to_string(&original).unwrap();
        let restored: CompanyId = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_company_id_deserialization_rejects_empty() {
        let result: Result<CompanyId, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }
}
