//! Stripe webhook event envelope and the payload shapes this crate reads.

use serde::{Deserialize, Serialize};

use super::webhook_errors::WebhookError;

/// Webhook event as delivered by the processor.
///
/// Only `type` and `data.object` are required; everything else is optional
/// so that unsigned development payloads parse too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event identifier (evt_...).
    #[serde(default)]
    pub id: Option<String>,

    /// Event type discriminator (e.g. "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    #[serde(default)]
    pub created: Option<i64>,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: Option<bool>,

    /// Event payload containing the affected object.
    pub data: WebhookEventData,
}

/// Event data container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEventData {
    /// The processor object affected by this event.
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// Parses a raw webhook body.
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    /// The event type, classified.
    pub fn kind(&self) -> WebhookEventType {
        WebhookEventType::from(self.event_type.as_str())
    }

    /// Reads `data.object` as `T`, falling back to `T::default()` when the
    /// object has an unexpected shape. An authenticated event is never
    /// refused because of its payload.
    pub fn object_or_default<T: serde::de::DeserializeOwned + Default>(&self) -> T {
        self.object_as().unwrap_or_else(|e| {
            tracing::warn!(
                event_id = self.id.as_deref().unwrap_or_default(),
                error = %e,
                "Webhook object has an unexpected shape"
            );
            T::default()
        })
    }

    /// Deserializes `data.object` into a typed view.
    pub fn object_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        serde_json::from_value(self.data.object.clone()).map_err(|e| {
            WebhookError::ParseError(format!("unexpected {} payload: {}", self.event_type, e))
        })
    }
}

/// Event types this service reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    PaymentIntentSucceeded,
    PaymentIntentPaymentFailed,
    PaymentIntentCanceled,
    PaymentMethodAttached,
    /// Any other event type; acknowledged without processing.
    Unknown(String),
}

impl WebhookEventType {
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PaymentIntentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            WebhookEventType::PaymentIntentCanceled => "payment_intent.canceled",
            WebhookEventType::PaymentMethodAttached => "payment_method.attached",
            WebhookEventType::Unknown(s) => s,
        }
    }
}

impl From<&str> for WebhookEventType {
    fn from(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => WebhookEventType::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentIntentPaymentFailed,
            "payment_intent.canceled" => WebhookEventType::PaymentIntentCanceled,
            "payment_method.attached" => WebhookEventType::PaymentMethodAttached,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of a PaymentIntent object read from webhook payloads.
///
/// Every field is optional; handlers log whatever the processor sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentIntentObject {
    pub id: Option<String>,
    /// Amount in minor units.
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub last_payment_error: Option<LastPaymentError>,
    pub cancellation_reason: Option<String>,
}

/// Failure detail attached to a PaymentIntent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LastPaymentError {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// The fields of a PaymentMethod object read from webhook payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentMethodObject {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub method_type: Option<String>,
    pub customer: Option<String>,
}
