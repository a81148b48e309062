//! Webhook-specific error types.
//!
//! Webhook processing failures are caught at the endpoint layer and always
//! acknowledged with a generic failure body; these types carry the cause to
//! the log line, never to the response.

use thiserror::Error;

/// Errors raised while processing an inbound webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was present but did not match the payload.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// The payload was not a JSON object this integration understands.
    #[error("Invalid webhook payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected.
        reason: String,
    },
}

// Verify WebhookError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_signature_message() {
        assert_eq!(
            WebhookError::InvalidSignature.to_string(),
            "Invalid webhook signature"
        );
    }

    #[test]
    fn test_invalid_payload_includes_reason() {
        let error = WebhookError::InvalidPayload {
            reason: "expected object".to_string(),
        };
        assert!(error.to_string().contains("expected object"));
    }
}
