//! Webhook event types.
//!
//! Provider events arrive as JSON bodies with a `type` field. Known types
//! map onto the [`WebhookTopic`] enum so dispatch is exhaustiveness-checked
//! at compile time; unknown types are preserved as raw strings, logged, and
//! acknowledged.

use serde_json::Value;

use crate::webhooks::WebhookError;

/// Known webhook event topics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WebhookTopic {
    /// `company.updated`
    CompanyUpdated,
    /// `company.deleted`
    CompanyDeleted,
    /// `subscription.created`
    SubscriptionCreated,
    /// `subscription.updated`
    SubscriptionUpdated,
    /// `subscription.cancelled`
    SubscriptionCancelled,
    /// `payment.succeeded`
    PaymentSucceeded,
    /// `payment.failed`
    PaymentFailed,
}

impl WebhookTopic {
    /// Parses a provider event type string into a known topic.
    ///
    /// Returns `None` for unknown types; the dispatcher acknowledges those
    /// without invoking a handler.
    #[must_use]
    pub fn parse(event_type: &str) -> Option<Self> {
        match event_type {
            "company.updated" => Some(Self::CompanyUpdated),
            "company.deleted" => Some(Self::CompanyDeleted),
            "subscription.created" => Some(Self::SubscriptionCreated),
            "subscription.updated" => Some(Self::SubscriptionUpdated),
            "subscription.cancelled" => Some(Self::SubscriptionCancelled),
            "payment.succeeded" => Some(Self::PaymentSucceeded),
            "payment.failed" => Some(Self::PaymentFailed),
            _ => None,
        }
    }

    /// Returns the provider event type string for this topic.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompanyUpdated => "company.updated",
            Self::CompanyDeleted => "company.deleted",
            Self::SubscriptionCreated => "subscription.created",
            Self::SubscriptionUpdated => "subscription.updated",
            Self::SubscriptionCancelled => "subscription.cancelled",
            Self::PaymentSucceeded => "payment.succeeded",
            Self::PaymentFailed => "payment.failed",
        }
    }
}

/// A parsed webhook event.
#[derive(Clone, Debug)]
pub struct WebhookEvent {
    /// The raw `type` field, preserved for unknown topics.
    pub event_type: String,

    /// The full event payload.
    pub payload: Value,
}

impl WebhookEvent {
    /// Parses an event from the raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidPayload`] when the body is not a JSON
    /// object. A missing or non-string `type` field is tolerated (treated
    /// as an unknown event), matching the provider's loose contract.
    pub fn from_body(raw_body: &[u8]) -> Result<Self, WebhookError> {
        let payload: Value =
            serde_json::from_slice(raw_body).map_err(|e| WebhookError::InvalidPayload {
                reason: e.to_string(),
            })?;

        if !payload.is_object() {
            return Err(WebhookError::InvalidPayload {
                reason: "expected a JSON object".to_string(),
            });
        }

        let event_type = payload
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            event_type,
            payload,
        })
    }

    /// Resolves the known topic for this event, if any.
    #[must_use]
    pub fn topic(&self) -> Option<WebhookTopic> {
        WebhookTopic::parse(&self.event_type)
    }
}
