//! Payment processor port.
//!
//! Defines the contract for the payment gateway the relay brokers to
//! (Stripe or anything speaking its API). The processor owns every payment
//! intent; this port only creates them, reads them back, and authenticates
//! the webhooks the processor sends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::donation::{
    Currency, DonationAmount, DonationError, IdempotencyKey, PaymentIntentId,
    PaymentIntentStatus, WebhookError, WebhookEvent,
};

/// Port for payment processor integrations.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent for a validated amount.
    ///
    /// Automatic payment methods are always enabled.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Fetch the current state of a payment intent. One round-trip, no cache.
    async fn retrieve_payment_intent(
        &self,
        intent_id: &PaymentIntentId,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Authenticate a webhook delivery and decode its event.
    ///
    /// `signature` is the raw `Stripe-Signature` header, if one was sent.
    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentRequest {
    pub amount: DonationAmount,
    pub currency: Currency,
    /// Forwarded as the processor's `Idempotency-Key` header.
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Payment intent as seen by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor intent id (pi_...).
    pub id: String,

    /// Secret the client uses to confirm payment. Only present on intents
    /// fetched with the secret key.
    pub client_secret: Option<String>,

    pub status: PaymentIntentStatus,

    /// Amount in minor units.
    pub amount: i64,

    pub currency: String,
}

/// Errors from payment processor operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    pub code: PaymentErrorCode,

    /// Human-readable message, as reported by the processor when it sent one.
    pub message: String,

    /// Processor's error code (if available).
    pub provider_code: Option<String>,

    /// Derived from `code`.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attaches the processor's own error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NotFound, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::RateLimitExceeded, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Every processor failure surfaces to callers as an upstream error carrying
/// the processor's message unchanged.
impl From<PaymentError> for DonationError {
    fn from(err: PaymentError) -> Self {
        DonationError::Upstream {
            message: err.message,
            retryable: err.retryable,
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// The processor could not be reached.
    NetworkError,

    /// The processor did not answer within the configured timeout.
    Timeout,

    /// The secret key was refused.
    AuthenticationError,

    /// The processor rejected the request parameters.
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Processor-side failure.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Transient failures a caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::Timeout
                | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_processor_is_object_safe() {
        fn _accepts_dyn(_processor: &dyn PaymentProcessor) {}
    }

    #[test]
    fn only_transient_codes_are_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::Timeout.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());

        assert!(!PaymentErrorCode::InvalidRequest.is_retryable());
        assert!(!PaymentErrorCode::NotFound.is_retryable());
        assert!(!PaymentErrorCode::AuthenticationError.is_retryable());
    }

    #[test]
    fn display_includes_code_and_processor_message() {
        let err = PaymentError::invalid_request("Amount must be at least $0.50 usd");
        assert!(err.to_string().contains("invalid_request"));
        assert!(err.to_string().contains("Amount must be at least $0.50 usd"));
    }

    #[test]
    fn provider_code_is_attached() {
        let err = PaymentError::invalid_request("bad").with_provider_code("amount_too_small");
        assert_eq!(err.provider_code.as_deref(), Some("amount_too_small"));
    }

    #[test]
    fn converts_to_upstream_donation_error_with_message_verbatim() {
        let err: DonationError =
            PaymentError::not_found("No such payment_intent: 'pi_missing'").into();
        assert_eq!(err.to_string(), "No such payment_intent: 'pi_missing'");
        assert!(!err.is_validation());
        assert!(!err.is_retryable());

        let err: DonationError = PaymentError::timeout("request timed out").into();
        assert!(err.is_retryable());
    }
}
