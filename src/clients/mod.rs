//! Outbound HTTP clients for the provider API.
//!
//! This module contains the authenticated provider client used to fetch
//! tenant data after token exchange.

mod provider;

pub use provider::{CompanyProfile, ProviderClient, RequestContext};
