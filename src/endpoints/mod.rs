//! Framework-independent endpoint handlers.
//!
//! Routing and middleware belong to the host application; this module
//! provides the handler behind each route as a pure function over an [`App`]
//! dependency bundle, returning typed responses any Rust web framework can
//! render in a few lines:
//!
//! | Route | Handler | Response |
//! |---|---|---|
//! | `GET /auth/callback` | [`callback`] / [`callback_or_fallback`] | [`Redirect`] |
//! | `GET /auth/check` | [`check`] | [`ApiResponse`] |
//! | `GET /auth/me` | [`me`] | [`ApiResponse`] |
//! | `POST /auth/refresh` | [`refresh`] | [`ApiResponse`] |
//! | `POST /auth/logout` | [`logout`] | [`Redirect`] |
//! | `POST /auth/webhook` | [`webhook`] | [`ApiResponse`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use genuka_oauth::endpoints::{self, App};
//!
//! let app = App::new(config, store, cipher);
//!
//! // In the callback route handler:
//! let redirect = endpoints::callback(&app, &query_pairs).await?;
//! // Apply redirect.cookies as Set-Cookie headers, then 302 to redirect.location
//! ```

use serde_json::json;

use crate::auth::oauth::{handle_callback, refresh_session, CallbackQuery, OAuthError};
use crate::auth::session::{RequestCookies, SessionService, SetCookie};
use crate::clients::ProviderClient;
use crate::company::{Company, CompanyStore, StoreError, TokenCipher};
use crate::config::GenukaConfig;
use crate::webhooks::WebhookDispatcher;

/// Dependency bundle shared by all endpoint handlers.
///
/// Constructed once at startup and shared across requests; every field is
/// immutable after construction. The store and cipher are the embedder's
/// seams; everything else derives from the configuration.
pub struct App {
    /// Integration configuration.
    pub config: GenukaConfig,

    /// Provider admin API client.
    pub provider: ProviderClient,

    /// Company persistence.
    pub store: Box<dyn CompanyStore>,

    /// At-rest token cipher.
    pub cipher: Box<dyn TokenCipher>,

    /// Session issuer.
    pub sessions: SessionService,

    /// Webhook dispatcher.
    pub webhooks: WebhookDispatcher,
}

impl App {
    /// Wires the dependency bundle from the configuration plus the
    /// embedder's store and cipher.
    #[must_use]
    pub fn new(
        config: GenukaConfig,
        store: Box<dyn CompanyStore>,
        cipher: Box<dyn TokenCipher>,
    ) -> Self {
        let provider = ProviderClient::new(&config);
        let sessions = SessionService::new(&config);
        let webhooks = WebhookDispatcher::new(&config);
        Self {
            config,
            provider,
            store,
            cipher,
            sessions,
            webhooks,
        }
    }

    /// Wires an app over the in-memory store with the passthrough cipher.
    ///
    /// Intended for tests and prototyping.
    #[must_use]
    pub fn in_memory(config: GenukaConfig) -> Self {
        Self::new(
            config,
            Box::new(crate::company::MemoryStore::new()),
            Box::new(crate::company::PlaintextCipher),
        )
    }
}

/// A JSON response: status code, body, and cookies to queue.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,

    /// JSON body.
    pub body: serde_json::Value,

    /// Cookies to queue on the response.
    pub cookies: Vec<SetCookie>,
}

impl ApiResponse {
    fn ok(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body,
            cookies: Vec::new(),
        }
    }

    fn with_status(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body,
            cookies: Vec::new(),
        }
    }
}

/// A redirect response: location and cookies to queue.
#[derive(Clone, Debug)]
pub struct Redirect {
    /// Redirect target for the `Location` header.
    pub location: String,

    /// Cookies to queue on the response.
    pub cookies: Vec<SetCookie>,
}

/// `GET /auth/callback` — handles the OAuth landing from the provider.
///
/// On success, returns the redirect to the caller-supplied target with the
/// session token appended and both session cookies queued. Failures surface
/// as typed errors for the boundary layer to render; nothing is swallowed
/// here.
///
/// # Errors
///
/// See [`handle_callback`] for the failure taxonomy.
pub async fn callback(
    app: &App,
    query_pairs: &[(String, String)],
) -> Result<Redirect, OAuthError> {
    let query = CallbackQuery::from_pairs(query_pairs)?;
    let outcome = handle_callback(
        &app.config,
        &app.provider,
        app.store.as_ref(),
        app.cipher.as_ref(),
        &app.sessions,
        &query,
    )
    .await?;

    Ok(Redirect {
        location: outcome.redirect_url,
        cookies: outcome.session.cookies,
    })
}

/// `GET /auth/callback` — the simpler deployment variant.
///
/// Identical to [`callback`] except that failures redirect to the
/// configured fallback target (or `/`) with an `error` flash parameter
/// instead of surfacing an error response.
pub async fn callback_or_fallback(app: &App, query_pairs: &[(String, String)]) -> Redirect {
    match callback(app, query_pairs).await {
        Ok(redirect) => redirect,
        Err(err) => {
            let target = app.config.default_redirect().unwrap_or("/");
            let separator = if target.contains('?') { '&' } else { '?' };
            Redirect {
                location: format!(
                    "{target}{separator}error={}",
                    urlencoding::encode(&err.to_string())
                ),
                cookies: Vec::new(),
            }
        }
    }
}

/// `GET /auth/check` — reports whether the request is authenticated.
#[must_use]
pub fn check(app: &App, cookies: &RequestCookies) -> ApiResponse {
    let authenticated = app.sessions.current_company_id(cookies).is_some();
    ApiResponse::ok(json!({ "authenticated": authenticated }))
}

/// Resolves the authenticated company for a request.
///
/// The seam behind [`me`] and any auth middleware the embedder mounts:
/// verifies the session cookie, then loads the company record.
///
/// # Errors
///
/// Returns [`StoreError`] if the lookup fails; an unauthenticated request
/// or a company that no longer exists both resolve to `Ok(None)`.
pub fn authenticated_company(
    app: &App,
    cookies: &RequestCookies,
) -> Result<Option<Company>, StoreError> {
    let Some(company_id) = app.sessions.current_company_id(cookies) else {
        return Ok(None);
    };
    app.store.find(&company_id)
}

/// `GET /auth/me` — returns the authenticated company's profile.
///
/// Credential fields are never serialized. Unauthenticated requests get
/// `401 {error, code: "UNAUTHORIZED"}`.
#[must_use]
pub fn me(app: &App, cookies: &RequestCookies) -> ApiResponse {
    let company = match authenticated_company(app, cookies) {
        Ok(company) => company,
        Err(err) => {
            tracing::error!(error = %err, "Company lookup failed");
            return ApiResponse::with_status(
                500,
                json!({ "error": "Internal error", "code": "INTERNAL_ERROR" }),
            );
        }
    };

    let Some(company) = company else {
        return ApiResponse::with_status(
            401,
            json!({ "error": "Not authenticated", "code": "UNAUTHORIZED" }),
        );
    };

    ApiResponse::ok(json!({
        "id": company.id,
        "handle": company.handle,
        "name": company.name,
        "description": company.description,
        "logo_url": company.logo_url,
        "phone": company.phone,
        "created_at": company.created_at,
        "updated_at": company.updated_at,
    }))
}

/// `POST /auth/refresh` — refreshes the session from the refresh cookie.
///
/// No request body; the company id comes from the signed refresh cookie.
/// Returns `200 {success, message}` with fresh cookies, or `401 {error,
/// code}` with one of `REFRESH_TOKEN_INVALID`, `COMPANY_NOT_FOUND`,
/// `NO_REFRESH_TOKEN`, `REFRESH_FAILED`.
pub async fn refresh(app: &App, cookies: &RequestCookies) -> ApiResponse {
    match refresh_session(
        &app.config,
        app.store.as_ref(),
        app.cipher.as_ref(),
        &app.sessions,
        cookies,
    )
    .await
    {
        Ok(issued) => ApiResponse {
            status: 200,
            body: json!({
                "success": true,
                "message": "Session refreshed successfully",
            }),
            cookies: issued.cookies,
        },
        Err(err) => ApiResponse::with_status(
            401,
            json!({ "error": err.to_string(), "code": err.code() }),
        ),
    }
}

/// `POST /auth/logout` — clears both session cookies and redirects home.
#[must_use]
pub fn logout(app: &App) -> Redirect {
    Redirect {
        location: "/".to_string(),
        cookies: app.sessions.destroy(),
    }
}

/// `POST /auth/webhook` — validates and dispatches a webhook delivery.
///
/// Returns `200 {success: true}` for every acknowledged event (including
/// unknown types). Processing failures are logged with the raw event and
/// answered with a generic `500 {success: false}` that leaks no internals.
#[must_use]
pub fn webhook(app: &App, raw_body: &[u8], signature: Option<&str>) -> ApiResponse {
    match app.webhooks.handle(raw_body, signature) {
        Ok(_ack) => ApiResponse::ok(json!({
            "success": true,
            "message": "Webhook processed successfully",
        })),
        Err(err) => {
            tracing::error!(
                error = %err,
                raw_event = %String::from_utf8_lossy(raw_body),
                "Webhook processing error"
            );
            ApiResponse::with_status(
                500,
                json!({ "success": false, "error": "Failed to process webhook" }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SESSION_COOKIE_NAME;
    use crate::company::CompanyUpsert;
    use crate::config::{ClientId, ClientSecret, CompanyId};

    fn app() -> App {
        let config = GenukaConfig::builder()
            .client_id(ClientId::new("test-client").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .redirect_uri("https://app.example.com/auth/callback")
            .build()
            .unwrap();
        App::in_memory(config)
    }

    fn seed_company(app: &App, id: &str) {
        app.store
            .upsert(CompanyUpsert {
                id: CompanyId::new(id).unwrap(),
                handle: Some("acme".to_string()),
                name: "Acme".to_string(),
                description: None,
                logo_url: None,
                phone: Some("+237600000000".to_string()),
                access_token: Some("stored-access".to_string()),
                refresh_token: Some("stored-refresh".to_string()),
                token_expires_at: None,
                authorization_code: None,
            })
            .unwrap();
    }

    fn session_cookies(app: &App, id: &str) -> RequestCookies {
        let issued = app.sessions.create_session(&CompanyId::new(id).unwrap());
        let mut cookies = RequestCookies::new();
        cookies.insert(SESSION_COOKIE_NAME, issued.session_token);
        cookies
    }

    #[test]
    fn test_check_reports_unauthenticated_without_cookie() {
        let app = app();
        let response = check(&app, &RequestCookies::new());

        assert_eq!(response.status, 200);
        assert_eq!(response.body["authenticated"], false);
    }

    #[test]
    fn test_check_reports_authenticated_with_session_cookie() {
        let app = app();
        let cookies = session_cookies(&app, "c1");

        let response = check(&app, &cookies);
        assert_eq!(response.body["authenticated"], true);
    }

    #[test]
    fn test_me_returns_profile_without_credentials() {
        let app = app();
        seed_company(&app, "c1");
        let cookies = session_cookies(&app, "c1");

        let response = me(&app, &cookies);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["id"], "c1");
        assert_eq!(response.body["name"], "Acme");
        assert_eq!(response.body["handle"], "acme");
        assert!(response.body.get("access_token").is_none());
        assert!(response.body.get("refresh_token").is_none());
    }

    #[test]
    fn test_me_returns_401_without_session() {
        let app = app();
        let response = me(&app, &RequestCookies::new());

        assert_eq!(response.status, 401);
        assert_eq!(response.body["code"], "UNAUTHORIZED");
    }

    #[test]
    fn test_me_returns_401_for_session_of_deleted_company() {
        let app = app();
        // Session exists but the company record does not
        let cookies = session_cookies(&app, "ghost");

        let response = me(&app, &cookies);
        assert_eq!(response.status, 401);
    }

    #[test]
    fn test_logout_clears_cookies_and_redirects_home() {
        let app = app();
        let redirect = logout(&app);

        assert_eq!(redirect.location, "/");
        assert_eq!(redirect.cookies.len(), 2);
        assert!(redirect.cookies.iter().all(|c| c.max_age_secs == 0));
    }

    #[test]
    fn test_webhook_acknowledges_unknown_event_without_signature() {
        let app = app();
        let response = webhook(&app, br#"{"type": "unknown.event"}"#, None);

        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], true);
    }

    #[test]
    fn test_webhook_returns_generic_500_on_bad_signature() {
        let app = app();
        let response = webhook(&app, br#"{"type": "company.updated"}"#, Some("bad-signature"));

        assert_eq!(response.status, 500);
        assert_eq!(response.body["success"], false);
        // The body must not leak why processing failed
        assert_eq!(response.body["error"], "Failed to process webhook");
    }

    #[tokio::test]
    async fn test_refresh_without_cookie_returns_refresh_token_invalid() {
        let app = app();
        let response = refresh(&app, &RequestCookies::new()).await;

        assert_eq!(response.status, 401);
        assert_eq!(response.body["code"], "REFRESH_TOKEN_INVALID");
    }

    #[tokio::test]
    async fn test_callback_or_fallback_redirects_with_error_flash() {
        let config = GenukaConfig::builder()
            .client_id(ClientId::new("test-client").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .redirect_uri("https://app.example.com/auth/callback")
            .default_redirect("https://app.example.com/install")
            .build()
            .unwrap();
        let app = App::in_memory(config);

        // Missing parameters make the callback fail before any side effect
        let redirect = callback_or_fallback(&app, &[]).await;

        assert!(redirect
            .location
            .starts_with("https://app.example.com/install?error="));
        assert!(redirect.cookies.is_empty());
    }
}
