//! Payment intent identifiers and lifecycle status.
//!
//! The processor owns every payment intent. This crate only reads the status
//! back, so the status type preserves whatever string the processor returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DonationError;

/// Status of a payment intent as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    /// A status introduced by the processor after this code was written.
    Other(String),
}

impl PaymentIntentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Succeeded => "succeeded",
            PaymentIntentStatus::Other(s) => s,
        }
    }

    /// No further transitions happen once an intent is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentIntentStatus::Succeeded | PaymentIntentStatus::Canceled
        )
    }
}

impl From<String> for PaymentIntentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "requires_payment_method" => PaymentIntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => PaymentIntentStatus::RequiresConfirmation,
            "requires_action" => PaymentIntentStatus::RequiresAction,
            "processing" => PaymentIntentStatus::Processing,
            "requires_capture" => PaymentIntentStatus::RequiresCapture,
            "canceled" => PaymentIntentStatus::Canceled,
            "succeeded" => PaymentIntentStatus::Succeeded,
            _ => PaymentIntentStatus::Other(s),
        }
    }
}

impl From<&str> for PaymentIntentStatus {
    fn from(s: &str) -> Self {
        PaymentIntentStatus::from(s.to_string())
    }
}

impl From<PaymentIntentStatus> for String {
    fn from(status: PaymentIntentStatus) -> Self {
        match status {
            PaymentIntentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a processor-side payment intent (`pi_...`).
///
/// Restricted to `[A-Za-z0-9_]` so it can be placed in a URL path verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentIntentId(String);

impl PaymentIntentId {
    const MAX_LEN: usize = 255;

    pub fn parse(id: &str) -> Result<Self, DonationError> {
        if id.is_empty() {
            return Err(DonationError::validation("id", "is required"));
        }
        if id.len() > Self::MAX_LEN {
            return Err(DonationError::validation("id", "is too long"));
        }
        if !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(DonationError::validation(
                "id",
                "may only contain letters, digits and underscores",
            ));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentIntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-supplied key that makes intent creation safe to retry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    const MAX_LEN: usize = 255;

    pub fn parse(key: &str) -> Result<Self, DonationError> {
        let key = key.trim();
        if key.is_empty() || key.len() > Self::MAX_LEN {
            return Err(DonationError::validation(
                "Idempotency-Key",
                "must be between 1 and 255 characters",
            ));
        }
        if !key.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            return Err(DonationError::validation(
                "Idempotency-Key",
                "must be printable ASCII",
            ));
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
