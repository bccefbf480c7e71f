//! HTTP adapter for the donation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse, HealthResponse,
    PaymentIntentStatusResponse,
};
pub use handlers::{
    DonationApiError, DonationAppState, WebhookApiError, IDEMPOTENCY_KEY_HEADER,
    STRIPE_SIGNATURE_HEADER,
};
pub use routes::donation_router;
