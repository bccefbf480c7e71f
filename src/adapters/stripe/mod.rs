//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` port for Stripe, including:
//! - Payment intent creation and retrieval
//! - Webhook signature verification
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window by default)
//! - The API key is handled via `secrecy::SecretString`

mod mock_payment_processor;
mod stripe_adapter;
mod stripe_types;

pub use mock_payment_processor::{MethodCall, MockPaymentProcessor};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use stripe_types::{StripeErrorBody, StripeErrorResponse, StripePaymentIntent};
