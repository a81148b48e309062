//! Authorization-code token exchange.
//!
//! This module trades an OAuth authorization code for access and refresh
//! tokens at the provider's token endpoint. The request is a form-encoded
//! POST, made once with no retry; any failure is surfaced to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use genuka_oauth::auth::oauth::exchange_code;
//!
//! let tokens = exchange_code(&config, "auth-code-123").await?;
//! println!("Access token expires in {:?} minutes", tokens.expires_in_minutes);
//! ```

use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;
use crate::config::GenukaConfig;

/// Grant type for the authorization-code exchange.
const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";

/// Form body for the token exchange request.
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    grant_type: &'a str,
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
}

/// Raw token endpoint response; `access_token` presence is validated after
/// parsing so its absence maps to a specific error rather than a serde one.
#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in_minutes: Option<i64>,
}

/// Tokens returned by the provider's OAuth endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessTokenResponse {
    /// The access token for provider API calls.
    pub access_token: String,

    /// The refresh token, when the provider issues one.
    pub refresh_token: Option<String>,

    /// Access token lifetime in minutes, when the provider reports one.
    pub expires_in_minutes: Option<i64>,
}

/// Exchanges an authorization code for access and refresh tokens.
///
/// Issues a single form-encoded POST to `{provider}/oauth/token` with
/// `grant_type=authorization_code`, the code, the client credentials, and
/// the registered redirect URI. There is no retry; the provider rejects
/// reused codes, so a failed exchange must surface to the caller.
///
/// # Errors
///
/// Returns [`OAuthError::TokenExchangeFailed`] on transport errors, non-2xx
/// responses, unparseable bodies, or a response missing `access_token`.
/// Non-2xx responses are logged with their full status and body before the
/// error is returned.
pub async fn exchange_code(
    config: &GenukaConfig,
    code: &str,
) -> Result<AccessTokenResponse, OAuthError> {
    let token_url = config.provider_url().join("/oauth/token");

    let request_body = TokenExchangeRequest {
        grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
        code,
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        redirect_uri: config.redirect_uri(),
    };

    let client = reqwest::Client::new();
    let response = client
        .post(&token_url)
        .form(&request_body)
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        tracing::error!(status, body = %error_body, "Token exchange failed");
        return Err(OAuthError::TokenExchangeFailed {
            status,
            message: error_body,
        });
    }

    let raw: RawTokenResponse =
        response
            .json()
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed {
                status,
                message: format!("Failed to parse token response: {e}"),
            })?;

    let Some(access_token) = raw.access_token else {
        return Err(OAuthError::TokenExchangeFailed {
            status,
            message: "Access token not found in response".to_string(),
        });
    };

    Ok(AccessTokenResponse {
        access_token,
        refresh_token: raw.refresh_token,
        expires_in_minutes: raw.expires_in_minutes,
    })
}
