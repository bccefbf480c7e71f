//! HTTP handlers for donation endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::donation::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, GetPaymentIntentStatusHandler,
    GetPaymentIntentStatusQuery, HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::domain::donation::{DonationError, WebhookDispatcher, WebhookError};
use crate::ports::PaymentProcessor;

use super::dto::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse, HealthResponse,
    PaymentIntentStatusResponse,
};

/// Header carrying the processor's webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Header a client may send to make intent creation retry-safe.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct DonationAppState {
    pub payment_processor: Arc<dyn PaymentProcessor>,
    pub webhook_dispatcher: Arc<dyn WebhookDispatcher>,
}

impl DonationAppState {
    pub fn new(
        payment_processor: Arc<dyn PaymentProcessor>,
        webhook_dispatcher: Arc<dyn WebhookDispatcher>,
    ) -> Self {
        Self {
            payment_processor,
            webhook_dispatcher,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.payment_processor.clone())
    }

    pub fn payment_intent_status_handler(&self) -> GetPaymentIntentStatusHandler {
        GetPaymentIntentStatusHandler::new(self.payment_processor.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_processor.clone(),
            self.webhook_dispatcher.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-payment-intent - Start a donation
pub async fn create_payment_intent(
    State(state): State<DonationAppState>,
    headers: HeaderMap,
    body: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DonationApiError> {
    let Json(request) = body.map_err(DonationApiError::from)?;

    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .map(|v| {
            v.to_str().map(str::to_string).map_err(|_| {
                DonationError::validation(IDEMPOTENCY_KEY_HEADER, "must be printable ASCII")
            })
        })
        .transpose()?;

    let cmd = CreatePaymentIntentCommand {
        amount: request.amount,
        currency: request.currency,
        idempotency_key,
    };

    let result = state.create_payment_intent_handler().handle(cmd).await?;

    Ok(Json(CreatePaymentIntentResponse::from(result)))
}

/// GET /payment-intent/:id - Read a payment intent's status
pub async fn get_payment_intent_status(
    State(state): State<DonationAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DonationApiError> {
    let query = GetPaymentIntentStatusQuery { intent_id: id };

    let status = state.payment_intent_status_handler().handle(query).await?;

    Ok(Json(PaymentIntentStatusResponse { status }))
}

/// POST /webhook - Handle processor webhook events
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn handle_webhook(
    State(state): State<DonationAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body,
        signature,
    };

    state.webhook_handler().handle(cmd).await?;

    Ok(StatusCode::OK)
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for the JSON endpoints.
#[derive(Debug)]
pub struct DonationApiError(DonationError);

impl From<DonationError> for DonationApiError {
    fn from(err: DonationError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for DonationApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DonationError::validation("request body", rejection.body_text()))
    }
}

impl IntoResponse for DonationApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            DonationError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            DonationError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(
                retryable = self.0.is_retryable(),
                error = %self.0,
                "Payment processor request failed"
            );
        }

        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

/// API error wrapper for the webhook endpoint. Plain-text body.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let message = format!("Webhook Error: {}", self.0);
        (self.0.status_code(), message).into_response()
    }
}
