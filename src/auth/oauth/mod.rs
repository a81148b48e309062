//! OAuth 2.0 flows for Genuka apps.
//!
//! This module implements the provider-facing half of the integration:
//!
//! - **Callback handling** ([`handle_callback`]): verifies the signed
//!   callback, exchanges the authorization code, fetches and persists the
//!   tenant, issues a session, and builds the outbound redirect.
//! - **Token exchange** ([`exchange_code`]): trades an authorization code
//!   for an access/refresh token pair.
//! - **Session refresh** ([`refresh_session`]): re-exchanges the stored
//!   refresh credential and re-issues the session cookies.
//! - **Signature verification** ([`hmac`]): canonicalization, HMAC-SHA256,
//!   constant-time comparison, and the replay window.
//!
//! # Security Features
//!
//! - **HMAC Validation**: callbacks are verified with HMAC-SHA256 over a
//!   canonical sorted-key form encoding of the signed parameters
//! - **Replay Protection**: callback timestamps outside a ±300 second
//!   window are rejected
//! - **Constant-Time Comparison**: signature comparisons use constant-time
//!   algorithms to prevent timing attacks
//! - **Fail-Closed Gates**: every verification failure stops the flow
//!   before any side effect
//!
//! # Example: Callback Flow
//!
//! ```rust,ignore
//! use genuka_oauth::auth::oauth::{handle_callback, CallbackQuery};
//!
//! // Parse the callback query parameters from the request
//! let query = CallbackQuery::from_pairs(&query_pairs)?;
//!
//! // Validate, exchange, persist, and issue the session
//! let outcome = handle_callback(&config, &provider, store, cipher, &sessions, &query).await?;
//!
//! // Queue outcome.session.cookies and redirect to outcome.redirect_url
//! ```

mod callback;
mod error;
pub mod hmac;
mod refresh;
mod token_exchange;
mod token_refresh;

pub use callback::{handle_callback, CallbackOutcome, CallbackQuery};
pub use error::OAuthError;
pub use hmac::{compute_signature, constant_time_compare, verify_signature, verify_timestamp};
pub use refresh::{refresh_session, RefreshError};
pub use token_exchange::{exchange_code, AccessTokenResponse};
pub use token_refresh::refresh_access_token;
