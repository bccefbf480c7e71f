//! Handlers for the webhook events the relay reacts to.
//!
//! The relay keeps no local state, so reacting to an event means recording
//! it in the structured log. Each handler owns exactly one event type.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::donation::{
    DonationAmount, EventRouter, PaymentIntentObject, PaymentMethodObject, WebhookError,
    WebhookEvent, WebhookEventHandler, WebhookEventType,
};

/// Builds the router with every built-in handler registered.
pub fn default_event_router() -> EventRouter {
    EventRouter::new()
        .with_handler(Arc::new(PaymentIntentSucceededHandler))
        .with_handler(Arc::new(PaymentIntentFailedHandler))
        .with_handler(Arc::new(PaymentIntentCanceledHandler))
        .with_handler(Arc::new(PaymentMethodAttachedHandler))
}

fn display_amount(minor_units: Option<i64>) -> String {
    match minor_units {
        Some(minor) => DonationAmount::from_minor_units(minor)
            .map(|a| a.to_string())
            .unwrap_or_else(|_| minor.to_string()),
        None => "an unknown amount".to_string(),
    }
}

/// `payment_intent.succeeded`
pub struct PaymentIntentSucceededHandler;

#[async_trait]
impl WebhookEventHandler for PaymentIntentSucceededHandler {
    fn handles(&self) -> Vec<WebhookEventType> {
        vec![WebhookEventType::PaymentIntentSucceeded]
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), WebhookError> {
        let intent: PaymentIntentObject = event.object_or_default();
        tracing::info!(
            event_id = event.id.as_deref().unwrap_or_default(),
            payment_intent_id = intent.id.as_deref().unwrap_or_default(),
            amount_minor = intent.amount,
            currency = intent.currency.as_deref().unwrap_or_default(),
            "PaymentIntent for {} was successful",
            display_amount(intent.amount)
        );
        Ok(())
    }
}

/// `payment_intent.payment_failed`
pub struct PaymentIntentFailedHandler;

#[async_trait]
impl WebhookEventHandler for PaymentIntentFailedHandler {
    fn handles(&self) -> Vec<WebhookEventType> {
        vec![WebhookEventType::PaymentIntentPaymentFailed]
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), WebhookError> {
        let intent: PaymentIntentObject = event.object_or_default();
        let failure = intent.last_payment_error.unwrap_or_default();
        tracing::warn!(
            event_id = event.id.as_deref().unwrap_or_default(),
            payment_intent_id = intent.id.as_deref().unwrap_or_default(),
            amount_minor = intent.amount,
            failure_code = failure.code.as_deref().unwrap_or("unknown"),
            failure_message = failure.message.as_deref().unwrap_or_default(),
            "PaymentIntent payment failed"
        );
        Ok(())
    }
}

/// `payment_intent.canceled`
pub struct PaymentIntentCanceledHandler;

#[async_trait]
impl WebhookEventHandler for PaymentIntentCanceledHandler {
    fn handles(&self) -> Vec<WebhookEventType> {
        vec![WebhookEventType::PaymentIntentCanceled]
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), WebhookError> {
        let intent: PaymentIntentObject = event.object_or_default();
        tracing::info!(
            event_id = event.id.as_deref().unwrap_or_default(),
            payment_intent_id = intent.id.as_deref().unwrap_or_default(),
            reason = intent.cancellation_reason.as_deref().unwrap_or("unspecified"),
            "PaymentIntent canceled"
        );
        Ok(())
    }
}

/// `payment_method.attached`
pub struct PaymentMethodAttachedHandler;

#[async_trait]
impl WebhookEventHandler for PaymentMethodAttachedHandler {
    fn handles(&self) -> Vec<WebhookEventType> {
        vec![WebhookEventType::PaymentMethodAttached]
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), WebhookError> {
        let method: PaymentMethodObject = event.object_or_default();
        tracing::info!(
            event_id = event.id.as_deref().unwrap_or_default(),
            payment_method_id = method.id.as_deref().unwrap_or_default(),
            method_type = method.method_type.as_deref().unwrap_or_default(),
            customer = method.customer.as_deref().unwrap_or_default(),
            "PaymentMethod attached"
        );
        Ok(())
    }
}
