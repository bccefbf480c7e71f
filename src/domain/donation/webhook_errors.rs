//! Failures while receiving a processor webhook.
//!
//! Defines every way a webhook delivery can fail, with HTTP status code
//! mapping. Stripe redelivers on any non-2xx answer. Unauthenticated or
//! undecodable deliveries map to 400; handler failures map to 500.

use axum::http::StatusCode;
use thiserror::Error;

/// Why a webhook delivery was refused or not processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No Stripe-Signature header was sent while verification is enforced.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// No `v1` signature matched.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the configured tolerance.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed too far in the future.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Header or body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A handler accepted the event but could not complete its work.
    #[error("Handler failed: {0}")]
    HandlerFailed(String),
}

impl WebhookError {
    /// True for every failure that means the payload cannot be trusted.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignature
                | WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
        )
    }

    /// Whether a redelivery could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::HandlerFailed(_))
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        if self.is_retryable() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}
