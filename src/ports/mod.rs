//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProcessor` - Payment intents and webhook verification

mod payment_processor;

pub use payment_processor::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentIntent, PaymentProcessor,
};
