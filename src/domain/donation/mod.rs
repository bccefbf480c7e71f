//! Donation domain module.
//!
//! Validates what donors submit and what the payment processor sends back.
//!
//! # Module Structure
//!
//! - `amount` - DonationAmount and Currency value objects
//! - `intent` - Payment intent ids, status, idempotency keys
//! - `errors` - DonationError
//! - `webhook_event` - Webhook envelope and typed payload views
//! - `webhook_verifier` - Stripe-Signature verification
//! - `webhook_dispatcher` - Routing verified events to handlers

mod amount;
mod errors;
mod intent;
mod webhook_dispatcher;
mod webhook_errors;
mod webhook_event;
mod webhook_verifier;

pub use amount::{Currency, DonationAmount, DEFAULT_CURRENCY, MAX_AMOUNT_MINOR};
pub use errors::DonationError;
pub use intent::{IdempotencyKey, PaymentIntentId, PaymentIntentStatus};
pub use webhook_dispatcher::{
    DispatchOutcome, EventRouter, WebhookDispatcher, WebhookEventHandler,
};
pub use webhook_errors::WebhookError;
pub use webhook_event::{
    LastPaymentError, PaymentIntentObject, PaymentMethodObject, WebhookEvent, WebhookEventData,
    WebhookEventType,
};
pub use webhook_verifier::{
    signature_header_for, SignatureHeader, VerificationMode, WebhookVerifier,
    DEFAULT_TOLERANCE_SECS,
};
