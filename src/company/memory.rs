//! In-memory company store.
//!
//! A thread-safe [`CompanyStore`] backed by a `HashMap` behind an `RwLock`.
//! Used by the crate's own tests and useful for embedders prototyping
//! before wiring a real database.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::company::{Company, CompanyStore, CompanyUpsert, StoreError, TokenUpdate};
use crate::config::CompanyId;

/// Thread-safe in-memory implementation of [`CompanyStore`].
///
/// Each method takes the lock for a single atomic read or write, matching
/// the store contract (last write wins, no cross-call coordination).
///
/// # Example
///
/// ```rust
/// use genuka_oauth::company::{CompanyStore, MemoryStore};
/// use genuka_oauth::CompanyId;
///
/// let store = MemoryStore::new();
/// let id = CompanyId::new("01JD5GAZ8M").unwrap();
/// assert!(store.find(&id).unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    companies: RwLock<HashMap<CompanyId, Company>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompanyStore for MemoryStore {
    fn find(&self, id: &CompanyId) -> Result<Option<Company>, StoreError> {
        let companies = self.companies.read().unwrap_or_else(|e| e.into_inner());
        Ok(companies.get(id).cloned())
    }

    fn upsert(&self, record: CompanyUpsert) -> Result<Company, StoreError> {
        let mut companies = self.companies.write().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();

        // An existing record keeps its creation timestamp
        let created_at = companies
            .get(&record.id)
            .map_or(now, |existing| existing.created_at);

        let company = Company {
            id: record.id.clone(),
            handle: record.handle,
            name: record.name,
            description: record.description,
            logo_url: record.logo_url,
            phone: record.phone,
            access_token: record.access_token,
            refresh_token: record.refresh_token,
            token_expires_at: record.token_expires_at,
            authorization_code: record.authorization_code,
            created_at,
            updated_at: now,
        };

        companies.insert(record.id, company.clone());
        Ok(company)
    }

    fn update_tokens(
        &self,
        id: &CompanyId,
        update: TokenUpdate,
    ) -> Result<Option<Company>, StoreError> {
        let mut companies = self.companies.write().unwrap_or_else(|e| e.into_inner());

        let Some(company) = companies.get_mut(id) else {
            return Ok(None);
        };

        company.access_token = Some(update.access_token);
        company.refresh_token = Some(update.refresh_token);
        company.token_expires_at = Some(update.token_expires_at);
        company.updated_at = Utc::now();

        Ok(Some(company.clone()))
    }
}
