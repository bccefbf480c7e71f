//! Donation handlers.
//!
//! ## Commands
//! - Creating payment intents
//! - Processing payment webhooks
//!
//! ## Queries
//! - Get payment intent status

mod create_payment_intent;
mod get_payment_intent_status;
mod handle_payment_webhook;
mod webhook_event_handlers;

// Commands
pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use handle_payment_webhook::{HandlePaymentWebhookCommand, HandlePaymentWebhookHandler};

// Queries
pub use get_payment_intent_status::{
    GetPaymentIntentStatusHandler, GetPaymentIntentStatusQuery, GetPaymentIntentStatusResult,
};

// Webhook event handlers
pub use webhook_event_handlers::{
    default_event_router, PaymentIntentCanceledHandler, PaymentIntentFailedHandler,
    PaymentIntentSucceededHandler, PaymentMethodAttachedHandler,
};
