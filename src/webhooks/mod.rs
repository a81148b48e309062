//! Webhook relay for provider events.
//!
//! The provider notifies the app of tenant lifecycle events (company,
//! subscription, payment) through signed webhook deliveries. This module
//! provides:
//!
//! - [`WebhookDispatcher`]: signature validation plus topic dispatch
//! - [`WebhookTopic`] / [`WebhookEvent`]: enum-keyed event types
//! - [`verify_signature`]: low-level raw-body signature check
//! - [`WebhookError`]: failure taxonomy
//!
//! # Delivery contract
//!
//! - The signature header ([`HEADER_SIGNATURE`]) is optional; a missing
//!   header logs a warning and processing continues.
//! - Unknown event types are logged and acknowledged, never rejected.
//! - All current handlers are pass-through stubs that only log.
//!
//! # Example
//!
//! ```rust,ignore
//! use genuka_oauth::webhooks::WebhookDispatcher;
//!
//! let dispatcher = WebhookDispatcher::new(&config);
//! let ack = dispatcher.handle(raw_body, signature_header)?;
//! ```

mod dispatch;
mod errors;
mod types;
mod verification;

pub use dispatch::{WebhookAck, WebhookDispatcher};
pub use errors::WebhookError;
pub use types::{WebhookEvent, WebhookTopic};
pub use verification::{verify_signature, HEADER_SIGNATURE};
