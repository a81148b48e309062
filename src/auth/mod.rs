//! Authentication for the Genuka integration layer.
//!
//! This module provides the two halves of authentication:
//!
//! - [`oauth`]: the provider-facing OAuth flows (callback verification,
//!   token exchange, session refresh)
//! - [`session`]: the app-facing session layer (double-cookie JWT sessions)
//!
//! # Flow
//!
//! ```rust,ignore
//! use genuka_oauth::auth::oauth::{handle_callback, CallbackQuery};
//! use genuka_oauth::auth::session::SessionService;
//!
//! // 1. Handle the provider callback; a session is issued on success
//! let outcome = handle_callback(&config, &provider, store, cipher, &sessions, &query).await?;
//!
//! // 2. Later requests resolve the company from the session cookie
//! let company_id = sessions.current_company_id(&request_cookies);
//! ```

pub mod oauth;
pub mod session;

pub use session::{IssuedSession, RequestCookies, SessionService, SetCookie};
