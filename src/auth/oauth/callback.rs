//! OAuth callback orchestration.
//!
//! This module composes the HMAC verifier, the token exchange client, the
//! provider client, the company store, and the session issuer into the
//! end-to-end callback flow:
//!
//! ```text
//! received -> hmac_verified -> token_exchanged -> company_fetched
//!          -> company_persisted -> session_issued -> redirected
//! ```
//!
//! Each step is a hard gate: any failure stops the flow and surfaces a
//! typed [`OAuthError`] after logging the cause with the company id.
//!
//! # Redirect encoding
//!
//! The `redirect_to` parameter arrives percent-encoded because it was itself
//! a signed parameter. It enters signature verification exactly as received
//! (re-encoding it would break verification against the provider's original
//! signing input) and is decoded exactly once for the outbound redirect.

use crate::auth::oauth::hmac::{verify_signature, verify_timestamp};
use crate::auth::oauth::token_exchange::exchange_code;
use crate::auth::oauth::OAuthError;
use crate::auth::session::{IssuedSession, SessionService};
use crate::clients::{ProviderClient, RequestContext};
use crate::company::{Company, CompanyStore, CompanyUpsert, TokenCipher};
use crate::config::{CompanyId, GenukaConfig};

/// Default access-token lifetime assumed when the provider omits
/// `expires_in_minutes`.
const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 60;

/// Query parameters of an OAuth callback, exactly as received.
///
/// All values are kept in their arrival encoding; `redirect_to` in
/// particular must not be decoded before signature verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackQuery {
    /// The authorization code to exchange.
    pub code: String,

    /// The provider-assigned company identifier.
    pub company_id: String,

    /// The callback timestamp (decimal Unix seconds).
    pub timestamp: String,

    /// The hex HMAC signature over the other parameters.
    pub hmac: String,

    /// The percent-encoded post-login redirect target.
    pub redirect_to: String,
}

impl CallbackQuery {
    /// Extracts and validates the required callback parameters from parsed
    /// query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MissingParameter`] for the first parameter that
    /// is absent or empty.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, OAuthError> {
        let get = |name: &'static str| -> Result<String, OAuthError> {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
                .ok_or(OAuthError::MissingParameter { name })
        };

        Ok(Self {
            code: get("code")?,
            company_id: get("company_id")?,
            timestamp: get("timestamp")?,
            hmac: get("hmac")?,
            redirect_to: get("redirect_to")?,
        })
    }

    /// Returns the signed parameter set: every callback parameter except
    /// the signature itself, with values exactly as received.
    #[must_use]
    pub fn signable_params(&self) -> Vec<(String, String)> {
        vec![
            ("code".to_string(), self.code.clone()),
            ("company_id".to_string(), self.company_id.clone()),
            ("redirect_to".to_string(), self.redirect_to.clone()),
            ("timestamp".to_string(), self.timestamp.clone()),
        ]
    }
}

/// Result of a successful callback.
#[derive(Clone, Debug)]
pub struct CallbackOutcome {
    /// The upserted company record.
    pub company: Company,

    /// The issued session with its cookies.
    pub session: IssuedSession,

    /// The decoded redirect target with `token=<session jwt>` appended.
    pub redirect_url: String,
}

/// Handles an OAuth callback end to end.
///
/// Verifies the signature and timestamp, exchanges the authorization code,
/// fetches the tenant profile, upserts the company record (tokens pass
/// through the installed cipher), issues a session, and builds the outbound
/// redirect URL.
///
/// Failures are logged with the company id and surfaced; nothing is
/// swallowed at this layer. For the deployment variant that prefers a
/// fallback redirect over an error response, see
/// [`crate::endpoints::callback_or_fallback`].
///
/// # Errors
///
/// - [`OAuthError::InvalidParameter`] when the company id is malformed
/// - [`OAuthError::InvalidSignature`] when signature or timestamp
///   verification fails
/// - [`OAuthError::TokenExchangeFailed`] when the code cannot be exchanged
///   (including a reused code on a repeated callback)
/// - [`OAuthError::ProfileFetchFailed`] when the tenant profile cannot be
///   fetched
/// - [`OAuthError::Store`] when persistence fails
pub async fn handle_callback(
    config: &GenukaConfig,
    provider: &ProviderClient,
    store: &dyn CompanyStore,
    cipher: &dyn TokenCipher,
    sessions: &SessionService,
    query: &CallbackQuery,
) -> Result<CallbackOutcome, OAuthError> {
    match run_callback(config, provider, store, cipher, sessions, query).await {
        Ok(outcome) => {
            tracing::info!(
                company_id = %query.company_id,
                company_name = %outcome.company.name,
                "OAuth callback completed successfully"
            );
            Ok(outcome)
        }
        Err(err) => {
            tracing::error!(
                company_id = %query.company_id,
                error = %err,
                "OAuth callback failed"
            );
            Err(err)
        }
    }
}

async fn run_callback(
    config: &GenukaConfig,
    provider: &ProviderClient,
    store: &dyn CompanyStore,
    cipher: &dyn TokenCipher,
    sessions: &SessionService,
    query: &CallbackQuery,
) -> Result<CallbackOutcome, OAuthError> {
    let company_id = CompanyId::new(query.company_id.clone()).map_err(|e| {
        OAuthError::InvalidParameter {
            name: "company_id",
            reason: e.to_string(),
        }
    })?;

    // Gate 1: signature and timestamp, fail closed before any side effects.
    // The error does not say which check failed.
    let secret = config.client_secret().as_ref();
    let now = chrono::Utc::now().timestamp();
    if !verify_signature(&query.signable_params(), &query.hmac, secret)
        || !verify_timestamp(&query.timestamp, now)
    {
        tracing::warn!(company_id = %company_id, "Rejected callback with invalid signature");
        return Err(OAuthError::InvalidSignature);
    }

    // Gate 2: exchange the authorization code. A reused code is rejected by
    // the provider and surfaces here as TokenExchangeFailed.
    let tokens = exchange_code(config, &query.code).await?;

    // Gate 3: fetch the tenant profile with the fresh access token.
    let ctx = RequestContext::new(tokens.access_token.clone()).with_company(company_id.clone());
    let profile = provider.fetch_company(&ctx).await?;

    // Gate 4: upsert keyed by the provider-assigned id. Last write wins.
    let expires_at = chrono::Utc::now()
        + chrono::Duration::minutes(
            tokens
                .expires_in_minutes
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_MINUTES),
        );
    let company = store.upsert(CompanyUpsert {
        id: company_id.clone(),
        handle: profile.handle.clone(),
        name: profile.name.clone(),
        description: profile.description.clone(),
        logo_url: profile.logo_url.clone(),
        phone: profile.contact_phone().map(ToString::to_string),
        access_token: Some(cipher.encrypt(&tokens.access_token)),
        refresh_token: tokens.refresh_token.as_deref().map(|t| cipher.encrypt(t)),
        token_expires_at: Some(expires_at),
        authorization_code: Some(query.code.clone()),
    })?;

    // Gate 5: issue the double-cookie session.
    let session = sessions.create_session(&company_id);

    // The redirect target is decoded exactly once for the outbound redirect.
    let redirect_url = build_redirect_url(&query.redirect_to, &session.session_token)?;

    Ok(CallbackOutcome {
        company,
        session,
        redirect_url,
    })
}

/// Decodes the percent-encoded redirect target once and appends the session
/// token as a query parameter.
fn build_redirect_url(redirect_to: &str, session_token: &str) -> Result<String, OAuthError> {
    let decoded =
        urlencoding::decode(redirect_to).map_err(|e| OAuthError::InvalidParameter {
            name: "redirect_to",
            reason: format!("not valid UTF-8 after decoding: {e}"),
        })?;

    let separator = if decoded.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{decoded}{separator}token={}",
        urlencoding::encode(session_token)
    ))
}
