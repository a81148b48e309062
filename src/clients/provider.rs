//! Authenticated client for the provider's admin API.
//!
//! Outbound calls carry an explicit, immutable [`RequestContext`] (access
//! token plus optional company routing header) instead of mutating shared
//! client state; each request is constructed from the context it is given.
//!
//! # Example
//!
//! ```rust,ignore
//! use genuka_oauth::clients::{ProviderClient, RequestContext};
//!
//! let provider = ProviderClient::new(&config);
//! let ctx = RequestContext::new("access-token").with_company(company_id.clone());
//! let profile = provider.fetch_company(&ctx).await?;
//! println!("Company name: {}", profile.name);
//! ```

use serde::Deserialize;

use crate::auth::oauth::OAuthError;
use crate::config::{CompanyId, GenukaConfig, ProviderUrl};

/// Provider API version segment for admin endpoints.
const ADMIN_API_VERSION: &str = "2023-11";

/// Routing header naming the tenant an admin request is scoped to.
const COMPANY_HEADER: &str = "X-Company";

/// Immutable per-request authentication context.
///
/// Constructed once per outbound call with the access token (and, where the
/// provider API requires it, the company id used as a routing header).
#[derive(Clone, Debug)]
pub struct RequestContext {
    access_token: String,
    company_id: Option<CompanyId>,
}

impl RequestContext {
    /// Creates a context carrying only a bearer token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            company_id: None,
        }
    }

    /// Returns a context that also routes requests to a specific company.
    #[must_use]
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the routing company id, if set.
    #[must_use]
    pub const fn company_id(&self) -> Option<&CompanyId> {
        self.company_id.as_ref()
    }
}

/// Company profile as reported by the provider's admin API.
///
/// Field names tolerate both snake_case and camelCase spellings
/// (`logo_url` / `logoUrl`), and the contact phone may arrive either as a
/// top-level `phone` field or nested under `metadata.contact`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompanyProfile {
    /// Display name (the only required profile field).
    pub name: String,

    /// Unique tenant handle.
    #[serde(default)]
    pub handle: Option<String>,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Logo URL, under either spelling.
    #[serde(default, alias = "logoUrl")]
    pub logo_url: Option<String>,

    /// Top-level contact phone.
    #[serde(default)]
    pub phone: Option<String>,

    /// Nested metadata blob carrying the contact field on some tenants.
    #[serde(default)]
    pub metadata: Option<ProfileMetadata>,
}

/// Nested profile metadata.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileMetadata {
    /// Contact phone stored in metadata.
    #[serde(default)]
    pub contact: Option<String>,
}

impl CompanyProfile {
    /// Resolves the contact phone, preferring the nested metadata contact
    /// over the top-level field.
    #[must_use]
    pub fn contact_phone(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.contact.as_deref())
            .or(self.phone.as_deref())
    }
}

/// Client for the provider's admin API.
///
/// Holds only the provider base URL; authentication state travels in the
/// [`RequestContext`] passed to each call.
#[derive(Clone, Debug)]
pub struct ProviderClient {
    base_url: ProviderUrl,
}

impl ProviderClient {
    /// Creates a client from the integration configuration.
    #[must_use]
    pub fn new(config: &GenukaConfig) -> Self {
        Self {
            base_url: config.provider_url().clone(),
        }
    }

    /// Fetches the tenant profile for the authenticated company.
    ///
    /// Issues a single GET to `{provider}/2023-11/admin/company` with the
    /// context's bearer token and, when present, the `X-Company` routing
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ProfileFetchFailed`] on transport errors,
    /// non-2xx responses, or malformed bodies. Non-2xx responses are logged
    /// with their full status and body before the error is returned.
    pub async fn fetch_company(
        &self,
        ctx: &RequestContext,
    ) -> Result<CompanyProfile, OAuthError> {
        let url = self.base_url.join(&format!("/{ADMIN_API_VERSION}/admin/company"));

        let client = reqwest::Client::new();
        let mut request = client.get(&url).bearer_auth(ctx.access_token());
        if let Some(company_id) = ctx.company_id() {
            request = request.header(COMPANY_HEADER, company_id.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| OAuthError::ProfileFetchFailed {
                status: 0,
                message: format!("Network error: {e}"),
            })?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status, body = %error_body, "Failed to fetch company profile");
            return Err(OAuthError::ProfileFetchFailed {
                status,
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OAuthError::ProfileFetchFailed {
                status,
                message: format!("Failed to parse company profile: {e}"),
            })
    }
}

// Verify client types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProviderClient>();
    assert_send_sync::<RequestContext>();
};
