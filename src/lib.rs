//! # Genuka OAuth Integration Layer
//!
//! A Rust integration layer between a host web application and the Genuka
//! commerce platform: OAuth2 authorization-code exchange, per-tenant
//! ("company") credential persistence, self-signed JWT session cookies with
//! a refresh handshake, and webhook relay.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GenukaConfig`] and [`GenukaConfigBuilder`]
//! - Validated newtypes for OAuth credentials and identifiers
//! - Signed-callback verification (HMAC-SHA256, constant-time comparison,
//!   replay window) via [`auth::oauth`]
//! - Authorization-code and refresh-token exchange via [`auth::oauth`]
//! - Double-cookie JWT session management via [`auth::session`]
//! - Company persistence seams ([`company::CompanyStore`],
//!   [`company::TokenCipher`]) with an in-memory store for tests
//! - Webhook signature validation and enum-keyed dispatch via [`webhooks`]
//! - Framework-independent endpoint handlers via [`endpoints`]
//!
//! ## Quick Start
//!
//! ```rust
//! use genuka_oauth::{GenukaConfig, ClientId, ClientSecret};
//!
//! // Create configuration using the builder pattern
//! let config = GenukaConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .redirect_uri("https://your-app.com/auth/callback")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Handling the OAuth Callback
//!
//! ```rust,ignore
//! use genuka_oauth::endpoints::{self, App};
//!
//! // Wire the dependency bundle once at startup
//! let app = App::new(config, store, cipher);
//!
//! // In your callback route handler:
//! let redirect = endpoints::callback(&app, &query_pairs).await?;
//! // Queue redirect.cookies as Set-Cookie headers, then 302 to redirect.location
//! ```
//!
//! ## Session Verification
//!
//! ```rust,ignore
//! use genuka_oauth::auth::session::RequestCookies;
//!
//! let cookies = RequestCookies::from_header(cookie_header);
//! if let Some(company_id) = app.sessions.current_company_id(&cookies) {
//!     // Authenticated as company_id
//! }
//! ```
//!
//! ## Refreshing a Session
//!
//! ```rust,ignore
//! // POST /auth/refresh — no body, the refresh cookie carries the identity
//! let response = endpoints::refresh(&app, &cookies).await;
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Webhooks
//!
//! ```rust,ignore
//! // POST /auth/webhook — X-Genuka-Signature header is optional
//! let response = endpoints::webhook(&app, raw_body, signature_header);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed
//!   explicitly; provider calls carry an immutable per-request context
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Fail-closed verification**: every callback gate stops the flow on
//!   failure, before any side effect
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Framework-agnostic**: routing, middleware, and persistence stay in
//!   the host application behind explicit seams

pub mod auth;
pub mod clients;
pub mod company;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod webhooks;

// Re-export public types at crate root for convenience
pub use config::{
    ClientId, ClientSecret, CompanyId, GenukaConfig, GenukaConfigBuilder, ProviderUrl,
};
pub use error::ConfigError;

// Re-export the auth surface
pub use auth::oauth::{
    exchange_code, handle_callback, refresh_access_token, refresh_session, AccessTokenResponse,
    CallbackOutcome, CallbackQuery, OAuthError, RefreshError,
};
pub use auth::session::{IssuedSession, RequestCookies, SessionService, SetCookie};

// Re-export company persistence seams
pub use company::{Company, CompanyStore, MemoryStore, PlaintextCipher, TokenCipher};

// Re-export webhook types
pub use webhooks::{WebhookDispatcher, WebhookError, WebhookEvent, WebhookTopic};
