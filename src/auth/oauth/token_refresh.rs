//! Refresh-token exchange.
//!
//! Trades a stored refresh token for a new token pair at the provider's
//! refresh endpoint. Like the authorization-code exchange, this is a single
//! attempt with no retry; a failure here means the tenant must reauthorize.

use serde::Serialize;

use crate::auth::oauth::token_exchange::AccessTokenResponse;
use crate::auth::oauth::OAuthError;
use crate::config::GenukaConfig;

/// JSON body for the refresh request.
#[derive(Debug, Serialize)]
struct TokenRefreshRequest<'a> {
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Raw refresh endpoint response.
#[derive(Debug, serde::Deserialize)]
struct RawRefreshResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in_minutes: Option<i64>,
}

/// Exchanges a refresh token for a new token pair.
///
/// Issues a single JSON POST to `{provider}/oauth/refresh` with the refresh
/// token and client credentials. The provider may rotate the refresh token;
/// when the response omits one, the caller keeps the stored value.
///
/// # Errors
///
/// Returns [`OAuthError::TokenRefreshFailed`] on transport errors, non-2xx
/// responses, unparseable bodies, or a response missing `access_token`.
/// Non-2xx responses are logged with their full status and body before the
/// error is returned.
pub async fn refresh_access_token(
    config: &GenukaConfig,
    refresh_token: &str,
) -> Result<AccessTokenResponse, OAuthError> {
    let refresh_url = config.provider_url().join("/oauth/refresh");

    let request_body = TokenRefreshRequest {
        refresh_token,
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
    };

    let client = reqwest::Client::new();
    let response = client
        .post(&refresh_url)
        .json(&request_body)
        .send()
        .await
        .map_err(|e| OAuthError::TokenRefreshFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        tracing::error!(status, body = %error_body, "Token refresh failed");
        return Err(OAuthError::TokenRefreshFailed {
            status,
            message: error_body,
        });
    }

    let raw: RawRefreshResponse =
        response
            .json()
            .await
            .map_err(|e| OAuthError::TokenRefreshFailed {
                status,
                message: format!("Failed to parse refresh response: {e}"),
            })?;

    let Some(access_token) = raw.access_token else {
        return Err(OAuthError::TokenRefreshFailed {
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
