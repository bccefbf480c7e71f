//! HandlePaymentWebhookHandler - Command handler for inbound processor webhooks.

use std::sync::Arc;

use axum::body::Bytes;

use crate::domain::donation::{DispatchOutcome, WebhookDispatcher, WebhookError};
use crate::ports::PaymentProcessor;

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Bytes,
    /// `Stripe-Signature` header, if present.
    pub signature: Option<String>,
}

/// Handler for processing payment processor webhooks.
///
/// Verification always runs before dispatch. A payload that fails
/// verification is never seen by an event handler.
pub struct HandlePaymentWebhookHandler {
    processor: Arc<dyn PaymentProcessor>,
    dispatcher: Arc<dyn WebhookDispatcher>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        processor: Arc<dyn PaymentProcessor>,
        dispatcher: Arc<dyn WebhookDispatcher>,
    ) -> Self {
        Self {
            processor,
            dispatcher,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<DispatchOutcome, WebhookError> {
        // 1. Verify webhook signature and parse event
        let event = self
            .processor
            .verify_webhook(&cmd.payload, cmd.signature.as_deref())
            .map_err(|e| {
                if e.is_verification_failure() {
                    tracing::warn!(error = %e, "Webhook failed signature verification");
                } else {
                    tracing::warn!(error = %e, "Webhook payload could not be parsed");
                }
                e
            })?;

        // 2. Dispatch on event type
        let outcome = self.dispatcher.dispatch(&event).await.map_err(|e| {
            tracing::error!(
                event_id = event.id.as_deref().unwrap_or_default(),
                event_type = %event.event_type,
                error = %e,
                "Webhook handler failed"
            );
            e
        })?;

        if let DispatchOutcome::Ignored(event_type) = &outcome {
            tracing::info!(event_type = %event_type, "Unhandled event type");
        }

        Ok(outcome)
    }
}
