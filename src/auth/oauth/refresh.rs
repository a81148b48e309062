//! Session refresh orchestration.
//!
//! Validates the refresh cookie, re-exchanges the stored refresh credential
//! with the provider, rotates the stored tokens, and issues a fresh session.
//! No request body is involved; the company id comes from the signed refresh
//! cookie.
//!
//! Any provider-side failure surfaces as [`RefreshError::RefreshFailed`],
//! instructing the tenant to reinstall — this path never retries
//! automatically.

use thiserror::Error;

use crate::auth::oauth::token_refresh::refresh_access_token;
use crate::auth::oauth::OAuthError;
use crate::auth::session::{IssuedSession, RequestCookies, SessionService};
use crate::company::{CompanyStore, TokenCipher, TokenUpdate};
use crate::config::GenukaConfig;

/// Default access-token lifetime assumed when the provider omits
/// `expires_in_minutes`.
const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 60;

/// Failure modes of the refresh flow.
///
/// Each variant carries a stable machine-readable code (see
/// [`RefreshError::code`]) surfaced in the JSON error responses of the
/// refresh endpoint.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The refresh cookie is missing, expired, tampered with, or carries a
    /// session token instead of a refresh token.
    #[error("Invalid or expired refresh token")]
    InvalidToken,

    /// The token verified but no company exists for its id.
    #[error("Company not found")]
    CompanyNotFound {
        /// The company id carried by the verified token.
        company_id: String,
    },

    /// The company has no stored refresh credential; it must reinstall.
    #[error("No refresh token available. Please reinstall the app.")]
    NoRefreshToken {
        /// The company id.
        company_id: String,
    },

    /// The provider rejected the refresh, or persistence failed while
    /// rotating tokens.
    #[error("Failed to refresh session. Please reinstall the app.")]
    RefreshFailed,
}

impl RefreshError {
    /// Returns the stable error code for JSON responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "REFRESH_TOKEN_INVALID",
            Self::CompanyNotFound { .. } => "COMPANY_NOT_FOUND",
            Self::NoRefreshToken { .. } => "NO_REFRESH_TOKEN",
            Self::RefreshFailed => "REFRESH_FAILED",
        }
    }
}

/// Refreshes the session for the company identified by the refresh cookie.
///
/// Steps, each failing closed:
///
/// 1. Verify the refresh cookie (signature, expiry, `type == "refresh"`).
/// 2. Look up the company; fail if absent or without a stored refresh token.
/// 3. Exchange the stored refresh token at the provider (single attempt).
/// 4. Rotate the stored tokens; a response without a new refresh token
///    keeps the current one.
/// 5. Issue a fresh double-cookie session.
///
/// # Errors
///
/// See [`RefreshError`] for the failure taxonomy.
pub async fn refresh_session(
    config: &GenukaConfig,
    store: &dyn CompanyStore,
    cipher: &dyn TokenCipher,
    sessions: &SessionService,
    cookies: &RequestCookies,
) -> Result<IssuedSession, RefreshError> {
    // The company id comes from the signed cookie, so it is tamper-proof.
    let company_id = sessions
        .verify_refresh_token(cookies)
        .ok_or(RefreshError::InvalidToken)?;

    let company = store
        .find(&company_id)
        .map_err(|err| {
            tracing::error!(company_id = %company_id, error = %err, "Company lookup failed");
            RefreshError::RefreshFailed
        })?
        .ok_or_else(|| RefreshError::CompanyNotFound {
            company_id: company_id.as_ref().to_string(),
        })?;

    let stored_refresh = company
        .refresh_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RefreshError::NoRefreshToken {
            company_id: company_id.as_ref().to_string(),
        })?;

    let plain_refresh = cipher.decrypt(stored_refresh).map_err(|err| {
        tracing::error!(company_id = %company_id, error = %err, "Stored refresh token unreadable");
        RefreshError::RefreshFailed
    })?;

    let tokens = refresh_access_token(config, &plain_refresh)
        .await
        .map_err(|err: OAuthError| {
            tracing::error!(company_id = %company_id, error = %err, "Session refresh failed");
            RefreshError::RefreshFailed
        })?;

    // The provider may rotate the refresh token; keep the current one when
    // the response omits it.
    let next_refresh = tokens.refresh_token.as_deref().unwrap_or(&plain_refresh);
    let expires_at = chrono::Utc::now()
        + chrono::Duration::minutes(
            tokens
                .expires_in_minutes
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_MINUTES),
        );

    let updated = store
        .update_tokens(
            &company_id,
            TokenUpdate {
                access_token: cipher.encrypt(&tokens.access_token),
                refresh_token: cipher.encrypt(next_refresh),
                token_expires_at: expires_at,
            },
        )
        .map_err(|err| {
            tracing::error!(company_id = %company_id, error = %err, "Token rotation failed");
            RefreshError::RefreshFailed
        })?;

    if updated.is_none() {
        return Err(RefreshError::CompanyNotFound {
            company_id: company_id.as_ref().to_string(),
        });
    }

    Ok(sessions.create_session(&company_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::REFRESH_COOKIE_NAME;
    use crate::company::{CompanyUpsert, MemoryStore, PlaintextCipher};
    use crate::config::{ClientId, ClientSecret, CompanyId, ProviderUrl};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(uri: &str) -> GenukaConfig {
        GenukaConfig::builder()
            .provider_url(ProviderUrl::new(uri).unwrap())
            .client_id(ClientId::new("test-client").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .redirect_uri("https://app.example.com/auth/callback")
            .build()
            .unwrap()
    }

    fn seed_company(store: &MemoryStore, id: &str, refresh_token: Option<&str>) {
        store
            .upsert(CompanyUpsert {
                id: CompanyId::new(id).unwrap(),
                handle: None,
                name: "Acme".to_string(),
                description: None,
                logo_url: None,
                phone: None,
                access_token: Some("stored-access".to_string()),
                refresh_token: refresh_token.map(ToString::to_string),
                token_expires_at: None,
                authorization_code: None,
            })
            .unwrap();
    }

    fn refresh_cookies(sessions: &SessionService, company_id: &str) -> RequestCookies {
        let issued = sessions.create_session(&CompanyId::new(company_id).unwrap());
        let mut cookies = RequestCookies::new();
        cookies.insert(REFRESH_COOKIE_NAME, issued.refresh_token);
        cookies
    }

    #[tokio::test]
    async fn test_refresh_fails_without_cookie() {
        let config = config_for("http://127.0.0.1:1");
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();

        let result = refresh_session(
            &config,
            &store,
            &PlaintextCipher,
            &sessions,
            &RequestCookies::new(),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RefreshError::InvalidToken));
        assert_eq!(err.code(), "REFRESH_TOKEN_INVALID");
    }

    #[tokio::test]
    async fn test_refresh_rejects_session_token_in_refresh_cookie() {
        let config = config_for("http://127.0.0.1:1");
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();
        seed_company(&store, "c1", Some("stored-refresh"));

        let issued = sessions.create_session(&CompanyId::new("c1").unwrap());
        let mut cookies = RequestCookies::new();
        cookies.insert(REFRESH_COOKIE_NAME, issued.session_token); // wrong type

        let result = refresh_session(&config, &store, &PlaintextCipher, &sessions, &cookies).await;
        assert!(matches!(result.unwrap_err(), RefreshError::InvalidToken));
    }

    #[tokio::test]
    async fn test_refresh_fails_for_unknown_company() {
        let config = config_for("http://127.0.0.1:1");
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();

        let cookies = refresh_cookies(&sessions, "ghost");
        let result = refresh_session(&config, &store, &PlaintextCipher, &sessions, &cookies).await;

        let err = result.unwrap_err();
        assert!(matches!(err, RefreshError::CompanyNotFound { .. }));
        assert_eq!(err.code(), "COMPANY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_refresh_fails_without_stored_refresh_token() {
        let config = config_for("http://127.0.0.1:1");
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();
        seed_company(&store, "c1", None);

        let cookies = refresh_cookies(&sessions, "c1");
        let result = refresh_session(&config, &store, &PlaintextCipher, &sessions, &cookies).await;

        let err = result.unwrap_err();
        assert!(matches!(err, RefreshError::NoRefreshToken { .. }));
        assert_eq!(err.code(), "NO_REFRESH_TOKEN");
    }

    #[tokio::test]
    async fn test_refresh_maps_provider_rejection_to_refresh_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();
        seed_company(&store, "c1", Some("stored-refresh"));

        let cookies = refresh_cookies(&sessions, "c1");
        let result = refresh_session(&config, &store, &PlaintextCipher, &sessions, &cookies).await;

        let err = result.unwrap_err();
        assert!(matches!(err, RefreshError::RefreshFailed));
        assert_eq!(err.code(), "REFRESH_FAILED");
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens_and_issues_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "rotated-access",
                "refresh_token": "rotated-refresh",
                "expires_in_minutes": 120
            })))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();
        seed_company(&store, "c1", Some("stored-refresh"));

        let cookies = refresh_cookies(&sessions, "c1");
        let issued = refresh_session(&config, &store, &PlaintextCipher, &sessions, &cookies)
            .await
            .unwrap();

        assert_eq!(issued.cookies.len(), 2);

        let company = store
            .find(&CompanyId::new("c1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(company.access_token.as_deref(), Some("rotated-access"));
        assert_eq!(company.refresh_token.as_deref(), Some("rotated-refresh"));
        assert!(company.token_expires_at.is_some());
    }

    #[tokio::test]
    async fn test_refresh_keeps_stored_refresh_token_when_response_omits_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "rotated-access"
            })))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let sessions = SessionService::new(&config);
        let store = MemoryStore::new();
        seed_company(&store, "c1", Some("stored-refresh"));

        let cookies = refresh_cookies(&sessions, "c1");
        refresh_session(&config, &store, &PlaintextCipher, &sessions, &cookies)
            .await
            .unwrap();

        let company = store
            .find(&CompanyId::new("c1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(company.refresh_token.as_deref(), Some("stored-refresh"));
    }
}
