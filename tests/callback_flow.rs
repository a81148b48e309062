//! End-to-end tests for the OAuth callback flow.
//!
//! The provider base URL is configurable, so these tests run the full
//! callback pipeline against a wiremock provider: signature verification,
//! token exchange, profile fetch, company upsert, session issuance, and
//! redirect construction.

use genuka_oauth::auth::oauth::hmac::{canonical_message, compute_signature};
use genuka_oauth::auth::session::{REFRESH_COOKIE_NAME, SESSION_COOKIE_NAME};
use genuka_oauth::endpoints::{self, App};
use genuka_oauth::{ClientId, ClientSecret, CompanyId, GenukaConfig, OAuthError, ProviderUrl};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-secret";
const REDIRECT_TO: &str = "https%3A%2F%2Fapp.example.com%2Fdashboard";

fn config_for(server: &MockServer) -> GenukaConfig {
    GenukaConfig::builder()
        .provider_url(ProviderUrl::new(server.uri()).unwrap())
        .client_id(ClientId::new("test-client").unwrap())
        .client_secret(ClientSecret::new(SECRET).unwrap())
        .redirect_uri("https://app.example.com/auth/callback")
        .build()
        .unwrap()
}

/// Builds a correctly signed callback query with a fresh timestamp.
fn signed_query(code: &str, company_id: &str, redirect_to: &str) -> Vec<(String, String)> {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let mut pairs = vec![
        ("code".to_string(), code.to_string()),
        ("company_id".to_string(), company_id.to_string()),
        ("timestamp".to_string(), timestamp),
        ("redirect_to".to_string(), redirect_to.to_string()),
    ];

    let hmac = compute_signature(&canonical_message(&pairs), SECRET);
    pairs.push(("hmac".to_string(), hmac));
    pairs
}

async fn mount_token_exchange(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access-token",
            "refresh_token": "new-refresh-token",
            "expires_in_minutes": 60
        })))
        .mount(server)
        .await;
}

async fn mount_company_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/2023-11/admin/company"))
        .and(header("Authorization", "Bearer new-access-token"))
        .and(header("X-Company", "C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Acme Stores",
            "handle": "acme",
            "description": "A test company",
            "logoUrl": "https://cdn.example.com/logo.png",
            "metadata": {"contact": "+237600000000"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn valid_callback_upserts_company_sets_cookies_and_redirects() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    mount_company_profile(&server).await;

    let app = App::in_memory(config_for(&server));
    let query = signed_query("abc", "C1", REDIRECT_TO);

    let redirect = endpoints::callback(&app, &query).await.unwrap();

    // Redirect goes to the decoded target with the session token appended
    assert!(redirect
        .location
        .starts_with("https://app.example.com/dashboard?token="));

    // Both cookies are queued
    let names: Vec<&str> = redirect.cookies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec![SESSION_COOKIE_NAME, REFRESH_COOKIE_NAME]);

    // The appended token verifies and identifies the company
    let token = redirect.location.split("token=").nth(1).unwrap();
    let decoded = urlencoding::decode(token).unwrap();
    let claims = app.sessions.verify_token(&decoded).unwrap();
    assert_eq!(claims.company_id, "C1");

    // The company record was upserted with the fetched profile
    let company = app
        .store
        .find(&CompanyId::new("C1").unwrap())
        .unwrap()
        .expect("company should be persisted");
    assert_eq!(company.name, "Acme Stores");
    assert_eq!(company.handle.as_deref(), Some("acme"));
    assert_eq!(company.logo_url.as_deref(), Some("https://cdn.example.com/logo.png"));
    assert_eq!(company.phone.as_deref(), Some("+237600000000"));
    assert_eq!(company.access_token.as_deref(), Some("new-access-token"));
    assert_eq!(company.refresh_token.as_deref(), Some("new-refresh-token"));
    assert_eq!(company.authorization_code.as_deref(), Some("abc"));
    assert!(company.token_expires_at.is_some());
}

#[tokio::test]
async fn callback_preserves_existing_query_in_redirect_target() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    mount_company_profile(&server).await;

    let app = App::in_memory(config_for(&server));
    // Encoded form of https://app.example.com/dashboard?from=install
    let query = signed_query(
        "abc",
        "C1",
        "https%3A%2F%2Fapp.example.com%2Fdashboard%3Ffrom%3Dinstall",
    );

    let redirect = endpoints::callback(&app, &query).await.unwrap();
    assert!(redirect
        .location
        .starts_with("https://app.example.com/dashboard?from=install&token="));
}

#[tokio::test]
async fn repeated_callback_with_reused_code_surfaces_upstream_error() {
    let server = MockServer::start().await;

    // The provider accepts the code once, then rejects the reuse
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access-token",
            "refresh_token": "new-refresh-token",
            "expires_in_minutes": 60
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;
    mount_company_profile(&server).await;

    let app = App::in_memory(config_for(&server));
    let query = signed_query("abc", "C1", REDIRECT_TO);

    // First callback succeeds
    endpoints::callback(&app, &query).await.unwrap();

    // Second callback with the same code fails upstream, without a crash,
    // and the previously persisted company is untouched
    let result = endpoints::callback(&app, &query).await;
    match result {
        Err(OAuthError::TokenExchangeFailed { status, .. }) => assert_eq!(status, 400),
        other => panic!("Expected TokenExchangeFailed, got {other:?}"),
    }

    let company = app
        .store
        .find(&CompanyId::new("C1").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(company.access_token.as_deref(), Some("new-access-token"));
}

#[tokio::test]
async fn callback_rejects_invalid_signature_before_side_effects() {
    let server = MockServer::start().await;
    // No provider mocks mounted: the flow must stop at the signature gate

    let app = App::in_memory(config_for(&server));
    let mut query = signed_query("abc", "C1", REDIRECT_TO);
    // Corrupt the signature
    query.last_mut().unwrap().1 = "0000000000000000000000000000000000000000000000000000000000000000".to_string();

    let result = endpoints::callback(&app, &query).await;
    assert!(matches!(result, Err(OAuthError::InvalidSignature)));
    assert!(app
        .store
        .find(&CompanyId::new("C1").unwrap())
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn callback_rejects_stale_timestamp_even_with_valid_signature() {
    let server = MockServer::start().await;
    let app = App::in_memory(config_for(&server));

    // Correctly signed, but 301 seconds old
    let stale = (chrono::Utc::now().timestamp() - 301).to_string();
    let mut pairs = vec![
        ("code".to_string(), "abc".to_string()),
        ("company_id".to_string(), "C1".to_string()),
        ("timestamp".to_string(), stale),
        ("redirect_to".to_string(), REDIRECT_TO.to_string()),
    ];
    let hmac = compute_signature(&canonical_message(&pairs), SECRET);
    pairs.push(("hmac".to_string(), hmac));

    let result = endpoints::callback(&app, &pairs).await;
    assert!(matches!(result, Err(OAuthError::InvalidSignature)));
}

#[tokio::test]
async fn callback_accepts_timestamp_at_the_replay_window_boundary() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    mount_company_profile(&server).await;

    let app = App::in_memory(config_for(&server));

    // 299 seconds of skew stays inside the window even if the check runs a
    // moment later
    let boundary = (chrono::Utc::now().timestamp() - 299).to_string();
    let mut pairs = vec![
        ("code".to_string(), "abc".to_string()),
        ("company_id".to_string(), "C1".to_string()),
        ("timestamp".to_string(), boundary),
        ("redirect_to".to_string(), REDIRECT_TO.to_string()),
    ];
    let hmac = compute_signature(&canonical_message(&pairs), SECRET);
    pairs.push(("hmac".to_string(), hmac));

    assert!(endpoints::callback(&app, &pairs).await.is_ok());
}

#[tokio::test]
async fn callback_rejects_missing_parameters() {
    let server = MockServer::start().await;
    let app = App::in_memory(config_for(&server));

    let result = endpoints::callback(
        &app,
        &[
            ("code".to_string(), "abc".to_string()),
            ("company_id".to_string(), "C1".to_string()),
        ],
    )
    .await;

    assert!(matches!(
        result,
        Err(OAuthError::MissingParameter { .. })
    ));
}

#[tokio::test]
async fn callback_surfaces_profile_fetch_failure() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    Mock::given(method("GET"))
        .and(path("/2023-11/admin/company"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(&server)
        .await;

    let app = App::in_memory(config_for(&server));
    let query = signed_query("abc", "C1", REDIRECT_TO);

    let result = endpoints::callback(&app, &query).await;
    match result {
        Err(OAuthError::ProfileFetchFailed { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("provider exploded"));
        }
        other => panic!("Expected ProfileFetchFailed, got {other:?}"),
    }

    // Nothing was persisted
    assert!(app
        .store
        .find(&CompanyId::new("C1").unwrap())
        .unwrap()
        .is_none());
}
