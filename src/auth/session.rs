//! Session management for authenticated companies.
//!
//! This module implements the double-cookie session pattern: a short-lived
//! `session` JWT (about seven hours) and a long-lived `refresh_session` JWT
//! (about thirty days), both signed HS256 with the OAuth client secret and
//! carried in `HttpOnly` cookies.
//!
//! # Token discrimination
//!
//! Both tokens carry a `type` claim (`"session"` or `"refresh"`). A refresh
//! token is never accepted where a session token is expected and vice versa,
//! regardless of a valid signature; [`SessionService::current_company_id`]
//! and [`SessionService::verify_refresh_token`] enforce the discriminator.
//!
//! # Cookie handling
//!
//! The crate is framework-agnostic, so cookies are modeled explicitly:
//! inbound request cookies as [`RequestCookies`] and outbound cookies as
//! [`SetCookie`] values ready to render into `Set-Cookie` headers. Issued
//! cookies are `HttpOnly`, `SameSite=Lax`, path `/`, with `Secure` set in
//! production deployments, and a max-age matching each token's lifetime.
//! Session cookies are self-signed JWTs and must be excluded from any
//! additional envelope encryption the outer framework applies to cookies.

use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{CompanyId, GenukaConfig};

/// Name of the short-lived session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Name of the long-lived refresh cookie.
pub const REFRESH_COOKIE_NAME: &str = "refresh_session";

/// Session token lifetime: 7 hours in seconds.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 7;

/// Refresh token lifetime: 30 days in seconds.
pub const REFRESH_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Discriminator claim separating session tokens from refresh tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    /// Short-lived session token.
    #[serde(rename = "session")]
    Session,

    /// Long-lived refresh token.
    #[serde(rename = "refresh")]
    Refresh,
}

/// Claims carried by both session and refresh tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The authenticated company's provider-assigned id.
    #[serde(rename = "companyId")]
    pub company_id: String,

    /// Token discriminator.
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

/// `SameSite` cookie attribute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    /// Sent on top-level navigations and same-site requests.
    Lax,
    /// Sent only on same-site requests.
    Strict,
    /// Sent on all requests (requires `Secure`).
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lax => f.write_str("Lax"),
            Self::Strict => f.write_str("Strict"),
            Self::None => f.write_str("None"),
        }
    }
}

/// An outbound cookie, ready to render into a `Set-Cookie` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCookie {
    /// Cookie name.
    pub name: String,

    /// Cookie value (a JWT or empty when clearing).
    pub value: String,

    /// Max-Age in seconds; `0` clears the cookie.
    pub max_age_secs: i64,

    /// Cookie path.
    pub path: &'static str,

    /// Whether the cookie is inaccessible to script.
    pub http_only: bool,

    /// Whether the cookie requires a secure transport.
    pub secure: bool,

    /// `SameSite` policy.
    pub same_site: SameSite,
}

impl SetCookie {
    /// Renders the cookie as a `Set-Cookie` header value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use genuka_oauth::auth::session::{SameSite, SetCookie};
    ///
    /// let cookie = SetCookie {
    ///     name: "session".to_string(),
    ///     value: "token".to_string(),
    ///     max_age_secs: 3600,
    ///     path: "/",
    ///     http_only: true,
    ///     secure: false,
    ///     same_site: SameSite::Lax,
    /// };
    /// assert_eq!(
    ///     cookie.header_value(),
    ///     "session=token; Max-Age=3600; Path=/; HttpOnly; SameSite=Lax"
    /// );
    /// ```
    #[must_use]
    pub fn header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Max-Age={}; Path={}",
            self.name, self.value, self.max_age_secs, self.path
        );
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str(&format!("; SameSite={}", self.same_site));
        header
    }
}

/// Inbound request cookies.
///
/// A thin name-to-value map parsed from the request's `Cookie` header.
#[derive(Clone, Debug, Default)]
pub struct RequestCookies {
    values: HashMap<String, String>,
}

impl RequestCookies {
    /// Creates an empty cookie set (no `Cookie` header on the request).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Cookie` header value (`name=value; other=value`).
    ///
    /// Malformed segments are skipped.
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        let mut values = HashMap::new();
        for segment in header.split(';') {
            if let Some((name, value)) = segment.trim().split_once('=') {
                values.insert(name.to_string(), value.to_string());
            }
        }
        Self { values }
    }

    /// Adds or replaces a cookie.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value of a cookie, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Tokens and cookies produced by [`SessionService::create_session`].
#[derive(Clone, Debug)]
pub struct IssuedSession {
    /// The session JWT (also appended to the callback redirect).
    pub session_token: String,

    /// The refresh JWT.
    pub refresh_token: String,

    /// The `session` and `refresh_session` cookies to queue on the response.
    pub cookies: Vec<SetCookie>,
}

/// Mints and verifies session and refresh tokens.
///
/// Verification is stateless and side-effect-free (a pure function of the
/// token, the secret, and the current time), so a single service instance
/// can be shared freely across concurrent requests.
#[derive(Clone)]
pub struct SessionService {
    secret: String,
    secure_cookies: bool,
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("secret", &"*****")
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl SessionService {
    /// Creates a session service from the integration configuration.
    ///
    /// The OAuth client secret signs the JWTs; production deployments get
    /// `Secure` cookies.
    #[must_use]
    pub fn new(config: &GenukaConfig) -> Self {
        Self {
            secret: config.client_secret().as_ref().to_string(),
            secure_cookies: config.production(),
        }
    }

    /// Mints a session token and a refresh token for a company and queues
    /// both cookies.
    ///
    /// Returns the session token string along with the cookies; the session
    /// token is what the callback flow appends to the outbound redirect.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // HS256 encoding of plain claims cannot fail
    pub fn create_session(&self, company_id: &CompanyId) -> IssuedSession {
        let now = chrono::Utc::now().timestamp();

        let session_token = self.encode_token(SessionClaims {
            company_id: company_id.as_ref().to_string(),
            token_type: TokenType::Session,
            iat: now,
            exp: now + SESSION_MAX_AGE_SECS,
        });

        let refresh_token = self.encode_token(SessionClaims {
            company_id: company_id.as_ref().to_string(),
            token_type: TokenType::Refresh,
            iat: now,
            exp: now + REFRESH_MAX_AGE_SECS,
        });

        let cookies = vec![
            self.cookie(SESSION_COOKIE_NAME, &session_token, SESSION_MAX_AGE_SECS),
            self.cookie(REFRESH_COOKIE_NAME, &refresh_token, REFRESH_MAX_AGE_SECS),
        ];

        IssuedSession {
            session_token,
            refresh_token,
            cookies,
        }
    }

    /// Decodes and signature-verifies a token.
    ///
    /// Returns `None` on any decode, signature, or expiry failure. Expiry is
    /// expected and frequent, so it is not logged as an error; other
    /// verification failures are.
    #[must_use]
    pub fn verify_token(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let key = DecodingKey::from_secret(self.secret.as_bytes());
        match decode::<SessionClaims>(token, &key, &validation) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                if !matches!(err.kind(), ErrorKind::ExpiredSignature) {
                    tracing::error!(error = %err, "JWT verification failed");
                }
                None
            }
        }
    }

    /// Resolves the authenticated company id from the session cookie.
    ///
    /// Requires a verifiable token of type `session`; refresh tokens are
    /// rejected here even when validly signed.
    #[must_use]
    pub fn current_company_id(&self, cookies: &RequestCookies) -> Option<CompanyId> {
        let token = cookies.get(SESSION_COOKIE_NAME)?;
        let claims = self.verify_token(token)?;

        if claims.token_type != TokenType::Session {
            return None;
        }

        CompanyId::new(claims.company_id).ok()
    }

    /// Resolves the company id from the refresh cookie.
    ///
    /// Requires a verifiable token of type `refresh`; session tokens are
    /// rejected here even when validly signed.
    #[must_use]
    pub fn verify_refresh_token(&self, cookies: &RequestCookies) -> Option<CompanyId> {
        let token = cookies.get(REFRESH_COOKIE_NAME)?;
        let claims = self.verify_token(token)?;

        if claims.token_type != TokenType::Refresh {
            return None;
        }

        CompanyId::new(claims.company_id).ok()
    }

    /// Clears both session cookies (logout).
    #[must_use]
    pub fn destroy(&self) -> Vec<SetCookie> {
        vec![
            self.cookie(SESSION_COOKIE_NAME, "", 0),
            self.cookie(REFRESH_COOKIE_NAME, "", 0),
        ]
    }

    fn encode_token(&self, claims: SessionClaims) -> String {
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
            .expect("HS256 encoding of plain claims cannot fail")
    }

    fn cookie(&self, name: &str, value: &str, max_age_secs: i64) -> SetCookie {
        SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            max_age_secs,
            path: "/",
            http_only: true,
            secure: self.secure_cookies,
            same_site: SameSite::Lax,
        }
    }
}

// Verify SessionService is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SessionService>();
    assert_send_sync::<SessionClaims>();
};
