//! Webhook event dispatch.
//!
//! Routes parsed events to per-topic handlers. The handlers are currently
//! pass-through stubs that only log; business effects are explicitly out of
//! scope for this integration layer. Unknown event types are logged and
//! acknowledged, never rejected, so the provider does not retry deliveries
//! this app has no interest in.

use crate::config::GenukaConfig;
use crate::webhooks::types::{WebhookEvent, WebhookTopic};
use crate::webhooks::verification::verify_signature;
use crate::webhooks::WebhookError;

/// Outcome of an acknowledged webhook delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookAck {
    /// The known topic that was dispatched, or `None` for unknown events.
    pub topic: Option<WebhookTopic>,
}

/// Validates and dispatches inbound webhook deliveries.
#[derive(Clone)]
pub struct WebhookDispatcher {
    secret: String,
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookDispatcher")
            .field("secret", &"*****")
            .finish()
    }
}

impl WebhookDispatcher {
    /// Creates a dispatcher from the integration configuration.
    ///
    /// The OAuth client secret doubles as the webhook signing secret.
    #[must_use]
    pub fn new(config: &GenukaConfig) -> Self {
        Self {
            secret: config.client_secret().as_ref().to_string(),
        }
    }

    /// Validates the signature (when present) and dispatches the event.
    ///
    /// A missing signature header is tolerated with a warning; signature
    /// enforcement is optional by design. A present signature that does not
    /// match the raw body fails the delivery.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::InvalidSignature`] when a supplied signature does
    ///   not match the raw body
    /// - [`WebhookError::InvalidPayload`] when the body is not a JSON object
    pub fn handle(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookAck, WebhookError> {
        match signature {
            Some(signature) => {
                if !verify_signature(raw_body, signature, &self.secret) {
                    return Err(WebhookError::InvalidSignature);
                }
            }
            None => {
                tracing::warn!("Webhook received without signature");
            }
        }

        let event = WebhookEvent::from_body(raw_body)?;
        Ok(self.dispatch(&event))
    }

    /// Routes an event to its handler by topic.
    fn dispatch(&self, event: &WebhookEvent) -> WebhookAck {
        let Some(topic) = event.topic() else {
            handle_unknown_event(event);
            return WebhookAck { topic: None };
        };

        match topic {
            WebhookTopic::CompanyUpdated => handle_company_updated(event),
            WebhookTopic::CompanyDeleted => handle_company_deleted(event),
            WebhookTopic::SubscriptionCreated => handle_subscription_created(event),
            WebhookTopic::SubscriptionUpdated => handle_subscription_updated(event),
            WebhookTopic::SubscriptionCancelled => handle_subscription_cancelled(event),
            WebhookTopic::PaymentSucceeded => handle_payment_succeeded(event),
            WebhookTopic::PaymentFailed => handle_payment_failed(event),
        }

        WebhookAck { topic: Some(topic) }
    }
}

fn handle_company_updated(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Company updated event");
}

fn handle_company_deleted(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Company deleted event");
}

fn handle_subscription_created(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Subscription created event");
}

fn handle_subscription_updated(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Subscription updated event");
}

fn handle_subscription_cancelled(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Subscription cancelled event");
}

fn handle_payment_succeeded(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Payment succeeded event");
}

fn handle_payment_failed(event: &WebhookEvent) {
    tracing::info!(payload = %event.payload, "Payment failed event");
}

fn handle_unknown_event(event: &WebhookEvent) {
    tracing::warn!(
        event_type = %event.event_type,
        payload = %event.payload,
        "Unknown webhook event type"
    );
}

// Verify WebhookDispatcher is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookDispatcher>();
};
