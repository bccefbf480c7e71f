//! Axum router configuration for donation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_payment_intent, get_payment_intent_status, handle_webhook, health, DonationAppState,
};

/// Create the donation API router.
///
/// # Routes
/// - `POST /create-payment-intent` - Create a payment intent (JSON body)
/// - `GET /payment-intent/:id` - Read intent status
/// - `POST /webhook` - Processor webhooks (raw body, signature verified)
/// - `GET /health` - Liveness probe
pub fn donation_router() -> Router<DonationAppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/payment-intent/:id", get(get_payment_intent_status))
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health))
}
