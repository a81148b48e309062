//! Error types for crate configuration.
//!
//! This module contains error types used for configuration and validation
//! errors raised while constructing the integration layer.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use genuka_oauth::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur during configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// OAuth client id cannot be empty.
    #[error("OAuth client id cannot be empty. Please provide the client id from your Genuka developer dashboard.")]
    EmptyClientId,

    /// OAuth client secret cannot be empty.
    #[error("OAuth client secret cannot be empty. Please provide the client secret from your Genuka developer dashboard.")]
    EmptyClientSecret,

    /// Provider base URL is invalid.
    #[error("Invalid provider URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.genuka.com').")]
    InvalidProviderUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Company identifier is invalid.
    #[error("Invalid company id '{id}'. Company ids are assigned by the provider and cannot be empty.")]
    InvalidCompanyId {
        /// The invalid id that was provided.
        id: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is missing or unreadable.
    #[error("Missing environment variable: '{name}'. Set it before constructing the configuration from the environment.")]
    MissingEnvVar {
        /// The name of the missing variable.
        name: &'static str,
    },
}
