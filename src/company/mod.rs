//! Company records and the persistence seam.
//!
//! A company is a tenant of the integration: an external business account
//! authenticated through the provider's OAuth flow. This module provides:
//!
//! - [`Company`]: the persisted tenant record
//! - [`CompanyUpsert`] / [`TokenUpdate`]: write payloads
//! - [`CompanyStore`]: the storage trait embedders implement over their ORM
//! - [`MemoryStore`]: a thread-safe in-memory implementation used in tests
//! - [`TokenCipher`] / [`PlaintextCipher`]: the at-rest token encryption seam
//!
//! # Identity
//!
//! The company id is assigned by the provider and is immutable; this crate
//! never generates ids locally. Upserts are keyed by id and the last write
//! wins — there is no optimistic concurrency guard, which is an accepted
//! limitation of the flow (concurrent callbacks for the same tenant race
//! silently).
//!
//! # Token storage
//!
//! `access_token` and `refresh_token` are stored in whatever form the
//! installed [`TokenCipher`] produces. The orchestrators encrypt before
//! writing and decrypt after reading; stores never see plaintext unless the
//! passthrough cipher is installed.

mod cipher;
mod memory;

pub use cipher::{CipherError, PlaintextCipher, TokenCipher};
pub use memory::MemoryStore;

use crate::config::CompanyId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// A persisted tenant record.
///
/// Created or updated (upsert by id) at the end of a successful OAuth
/// callback; token fields are mutated on refresh. Never hard-deleted by
/// this crate.
///
/// # Serialization
///
/// The credential fields (`access_token`, `refresh_token`,
/// `authorization_code`) are skipped during serialization so the record can
/// be returned from profile endpoints without leaking secrets.
#[derive(Clone, Debug, Serialize)]
pub struct Company {
    /// Provider-assigned identifier (immutable).
    pub id: CompanyId,

    /// Unique tenant handle, if the provider reports one.
    pub handle: Option<String>,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Logo URL.
    pub logo_url: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Stored access token (cipher output form).
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// Stored refresh token (cipher output form).
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    /// When the stored access token expires.
    pub token_expires_at: Option<DateTime<Utc>>,

    /// The last authorization code exchanged for this tenant.
    #[serde(skip_serializing)]
    pub authorization_code: Option<String>,

    /// When the record was first created.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

/// Write payload for creating or updating a company at callback time.
///
/// Token fields must already be in stored (cipher output) form.
#[derive(Clone, Debug)]
pub struct CompanyUpsert {
    /// Provider-assigned identifier.
    pub id: CompanyId,

    /// Tenant handle.
    pub handle: Option<String>,

    /// Display name (required by the provider profile).
    pub name: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Logo URL.
    pub logo_url: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Stored access token.
    pub access_token: Option<String>,

    /// Stored refresh token.
    pub refresh_token: Option<String>,

    /// When the access token expires.
    pub token_expires_at: Option<DateTime<Utc>>,

    /// The authorization code that produced these tokens.
    pub authorization_code: Option<String>,
}

/// Write payload for rotating a company's tokens on refresh.
///
/// Token fields must already be in stored (cipher output) form.
#[derive(Clone, Debug)]
pub struct TokenUpdate {
    /// New stored access token.
    pub access_token: String,

    /// New stored refresh token.
    pub refresh_token: String,

    /// When the new access token expires.
    pub token_expires_at: DateTime<Utc>,
}

/// Errors raised by a company store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error("Company store backend error: {message}")]
    Backend {
        /// Backend-specific failure description.
        message: String,
    },
}

/// Storage seam for company records.
///
/// Implementations adapt whatever persistence the host application uses
/// (an ORM table keyed by the provider-assigned id). The contract is a
/// single atomic write per call; no cross-call locking is expected, and
/// concurrent upserts for the same id resolve to last-write-wins.
pub trait CompanyStore: Send + Sync {
    /// Looks up a company by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn find(&self, id: &CompanyId) -> Result<Option<Company>, StoreError>;

    /// Creates or updates a company keyed by id.
    ///
    /// An existing record keeps its `created_at`; everything else is
    /// replaced by the payload. Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn upsert(&self, record: CompanyUpsert) -> Result<Company, StoreError>;

    /// Rotates the token fields of an existing company.
    ///
    /// Returns `None` when no record exists for the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn update_tokens(
        &self,
        id: &CompanyId,
        update: TokenUpdate,
    ) -> Result<Option<Company>, StoreError>;
}

// Verify the record types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Company>();
    assert_send_sync::<CompanyUpsert>();
    assert_send_sync::<TokenUpdate>();
};
