//! Configuration types for the Genuka integration layer.
//!
//! This module provides the core configuration types used to initialize
//! the OAuth integration with the Genuka platform.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GenukaConfig`]: The main configuration struct holding all settings
//! - [`GenukaConfigBuilder`]: A builder for constructing [`GenukaConfig`] instances
//! - [`ClientId`]: A validated OAuth client id newtype
//! - [`ClientSecret`]: A validated OAuth client secret newtype with masked debug output
//! - [`ProviderUrl`]: A validated provider base URL
//! - [`CompanyId`]: A validated provider-assigned company identifier
//!
//! # Example
//!
//! ```rust
//! use genuka_oauth::{GenukaConfig, ClientId, ClientSecret};
//!
//! let config = GenukaConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .redirect_uri("https://myapp.example.com/auth/callback")
//!     .build()
//!     .unwrap();
//! ```
//!
//! # Environment
//!
//! Deployments typically construct the configuration from the environment:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `GENUKA_URL` | Provider base URL | `https://api-staging.genuka.com` |
//! | `GENUKA_CLIENT_ID` | OAuth client id | required |
//! | `GENUKA_CLIENT_SECRET` | OAuth client secret | required |
//! | `GENUKA_REDIRECT_URI` | Registered OAuth redirect URI | required |
//! | `GENUKA_DEFAULT_REDIRECT` | Fallback post-login redirect | none |
//! | `GENUKA_ENCRYPT_TOKENS` | Encrypt stored tokens at rest | `true` |
//! | `APP_ENV` | `production` enables secure cookies | none |

mod newtypes;

pub use newtypes::{ClientId, ClientSecret, CompanyId, ProviderUrl};

use crate::error::ConfigError;

/// Default provider base URL used when `GENUKA_URL` is unset.
const DEFAULT_PROVIDER_URL: &str = "https://api-staging.genuka.com";

/// Configuration for the Genuka integration layer.
///
/// This struct holds all configuration needed to run the OAuth callback,
/// session refresh, and webhook flows: provider location, OAuth client
/// credentials, the registered redirect URI, and deployment toggles.
///
/// # Thread Safety
///
/// `GenukaConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use genuka_oauth::{GenukaConfig, ClientId, ClientSecret};
///
/// let config = GenukaConfig::builder()
///     .client_id(ClientId::new("id").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .redirect_uri("https://myapp.example.com/auth/callback")
///     .production(true)
///     .build()
///     .unwrap();
///
/// assert!(config.production());
/// ```
#[derive(Clone, Debug)]
pub struct GenukaConfig {
    provider_url: ProviderUrl,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_uri: String,
    default_redirect: Option<String>,
    encrypt_tokens: bool,
    production: bool,
}

impl GenukaConfig {
    /// Creates a new builder for constructing a `GenukaConfig`.
    #[must_use]
    pub fn builder() -> GenukaConfigBuilder {
        GenukaConfigBuilder::new()
    }

    /// Constructs the configuration from process environment variables.
    ///
    /// See the module documentation for the variable table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when a required variable is
    /// unset, or the underlying validation error when a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_url = std::env::var("GENUKA_URL")
            .unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_string());
        let client_id = std::env::var("GENUKA_CLIENT_ID")
            .map_err(|_| ConfigError::MissingEnvVar {
                name: "GENUKA_CLIENT_ID",
            })?;
        let client_secret = std::env::var("GENUKA_CLIENT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar {
                name: "GENUKA_CLIENT_SECRET",
            })?;
        let redirect_uri = std::env::var("GENUKA_REDIRECT_URI")
            .map_err(|_| ConfigError::MissingEnvVar {
                name: "GENUKA_REDIRECT_URI",
            })?;

        let mut builder = Self::builder()
            .provider_url(ProviderUrl::new(provider_url)?)
            .client_id(ClientId::new(client_id)?)
            .client_secret(ClientSecret::new(client_secret)?)
            .redirect_uri(redirect_uri)
            .encrypt_tokens(
                std::env::var("GENUKA_ENCRYPT_TOKENS")
                    .map_or(true, |v| v != "false" && v != "0"),
            )
            .production(
                std::env::var("APP_ENV").as_deref() == Ok("production"),
            );

        if let Ok(default_redirect) = std::env::var("GENUKA_DEFAULT_REDIRECT") {
            builder = builder.default_redirect(default_redirect);
        }

        builder.build()
    }

    /// Returns the provider base URL.
    #[must_use]
    pub const fn provider_url(&self) -> &ProviderUrl {
        &self.provider_url
    }

    /// Returns the OAuth client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    ///
    /// The secret signs callback HMACs, webhook payloads, and session JWTs.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the registered OAuth redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the fallback post-login redirect target, if configured.
    ///
    /// Used by [`crate::endpoints::callback_or_fallback`] to redirect with an
    /// error flash instead of surfacing callback failures.
    #[must_use]
    pub fn default_redirect(&self) -> Option<&str> {
        self.default_redirect.as_deref()
    }

    /// Returns whether stored tokens should be encrypted at rest.
    #[must_use]
    pub const fn encrypt_tokens(&self) -> bool {
        self.encrypt_tokens
    }

    /// Returns whether the deployment is production-like.
    ///
    /// Controls the `Secure` attribute on issued cookies.
    #[must_use]
    pub const fn production(&self) -> bool {
        self.production
    }
}

// Verify GenukaConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GenukaConfig>();
};

/// Builder for constructing [`GenukaConfig`] instances.
///
/// Required fields are `client_id`, `client_secret`, and `redirect_uri`.
/// All other fields have sensible defaults.
///
/// # Defaults
///
/// - `provider_url`: `https://api-staging.genuka.com`
/// - `default_redirect`: `None`
/// - `encrypt_tokens`: `true`
/// - `production`: `false`
#[derive(Debug, Default)]
pub struct GenukaConfigBuilder {
    provider_url: Option<ProviderUrl>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    redirect_uri: Option<String>,
    default_redirect: Option<String>,
    encrypt_tokens: Option<bool>,
    production: Option<bool>,
}

impl GenukaConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider base URL.
    #[must_use]
    pub fn provider_url(mut self, url: ProviderUrl) -> Self {
        self.provider_url = Some(url);
        self
    }

    /// Sets the OAuth client id (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the registered OAuth redirect URI (required).
    #[must_use]
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Sets the fallback post-login redirect target.
    #[must_use]
    pub fn default_redirect(mut self, target: impl Into<String>) -> Self {
        self.default_redirect = Some(target.into());
        self
    }

    /// Sets whether stored tokens are encrypted at rest.
    #[must_use]
    pub const fn encrypt_tokens(mut self, encrypt: bool) -> Self {
        self.encrypt_tokens = Some(encrypt);
        self
    }

    /// Sets whether the deployment is production-like.
    #[must_use]
    pub const fn production(mut self, production: bool) -> Self {
        self.production = Some(production);
        self
    }

    /// Builds the [`GenukaConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id`,
    /// `client_secret`, or `redirect_uri` are not set, or
    /// [`ConfigError::InvalidProviderUrl`] if the default provider URL
    /// fails validation.
    pub fn build(self) -> Result<GenukaConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;
        let redirect_uri = self
            .redirect_uri
            .ok_or(ConfigError::MissingRequiredField {
                field: "redirect_uri",
            })?;
        let provider_url = match self.provider_url {
            Some(url) => url,
            None => ProviderUrl::new(DEFAULT_PROVIDER_URL)?,
        };

        Ok(GenukaConfig {
            provider_url,
            client_id,
            client_secret,
            redirect_uri,
            default_redirect: self.default_redirect,
            encrypt_tokens: self.encrypt_tokens.unwrap_or(true),
            production: self.production.unwrap_or(false),
        })
    }
}
