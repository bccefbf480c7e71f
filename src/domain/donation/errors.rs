//! Donation-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | Upstream | 500 |

use thiserror::Error;

/// Errors raised while creating or inspecting a donation payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DonationError {
    /// Request input was rejected before reaching the processor.
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// The payment processor call failed. The message is the processor's own.
    #[error("{message}")]
    Upstream { message: String, retryable: bool },
}

impl DonationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DonationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        DonationError::Upstream {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DonationError::ValidationFailed { .. })
    }

    /// Returns true if the caller may safely repeat the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DonationError::Upstream { retryable: true, .. })
    }
}
