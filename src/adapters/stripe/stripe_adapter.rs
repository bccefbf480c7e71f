//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` trait against the Stripe REST API.
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Secrets handled via `secrecy::SecretString`
//! - Every request is bounded by the configured timeout
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key, WebhookVerifier::enforced(secret));
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{PaymentConfig, ValidationError};
use crate::domain::donation::{
    PaymentIntentId, VerificationMode, WebhookError, WebhookEvent, WebhookVerifier,
};
use crate::ports::{CreatePaymentIntentRequest, PaymentError, PaymentIntent, PaymentProcessor};

use super::stripe_types::{StripeErrorResponse, StripePaymentIntent};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Verifier for inbound webhooks.
    verifier: WebhookVerifier,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Upper bound on every outbound request.
    timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, verifier: WebhookVerifier) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            verifier,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from the application's payment section.
    pub fn from_payment_config(config: &PaymentConfig) -> Result<Self, ValidationError> {
        let verifier = match config.webhook_verification {
            VerificationMode::Enforced => {
                let secret = config
                    .webhook_secret()
                    .ok_or(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"))?;
                WebhookVerifier::enforced(secret)
            }
            VerificationMode::Disabled => WebhookVerifier::disabled(),
        }
        .with_tolerance(config.webhook_tolerance_secs);

        Ok(Self::new(config.api_key(), verifier)
            .with_base_url(config.api_base_url.clone())
            .with_timeout(Duration::from_secs(config.upstream_timeout_secs)))
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn verification_mode(&self) -> VerificationMode {
        self.verifier.mode()
    }
}

/// Stripe payment processor adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<PaymentIntent, PaymentError> {
        let response = request
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(
                    status = status.as_u16(),
                    error = %e,
                    "Failed to read Stripe error body"
                );
                String::new()
            });
            return Err(map_error_response(status, &body));
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
            }
        })?;

        Ok(intent.into())
    }
}

/// Maps a reqwest failure that happened before a response arrived.
fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        tracing::warn!(error = %e, "Stripe request timed out");
        PaymentError::timeout("Request to payment processor timed out")
    } else {
        tracing::warn!(error = %e, "Stripe request failed");
        PaymentError::network(e.to_string())
    }
}

/// Maps a non-2xx Stripe response, keeping Stripe's message verbatim.
fn map_error_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<StripeErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|r| r.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Stripe API error: HTTP {}", status.as_u16())
            } else {
                body.to_string()
            }
        });

    let error = match status.as_u16() {
        401 => PaymentError::authentication(message),
        404 => PaymentError::not_found(message),
        429 => PaymentError::rate_limited(message),
        400 | 402 => PaymentError::invalid_request(message),
        _ => PaymentError::provider(message),
    };

    tracing::error!(
        status = status.as_u16(),
        error_code = %error.code,
        "Stripe API error"
    );

    match parsed.and_then(|r| r.error.code.or(r.error.decline_code)) {
        Some(code) => error.with_provider_code(code),
        None => error,
    }
}

#[async_trait]
impl PaymentProcessor for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let params = [
            ("amount", request.amount.minor_units().to_string()),
            ("currency", request.currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let mut builder = self
            .http_client
            .post(self.url("/v1/payment_intents"))
            .form(&params);
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key.as_str());
        }

        self.send(builder).await
    }

    async fn retrieve_payment_intent(
        &self,
        intent_id: &PaymentIntentId,
    ) -> Result<PaymentIntent, PaymentError> {
        let builder = self
            .http_client
            .get(self.url(&format!("/v1/payment_intents/{}", intent_id)));

        self.send(builder).await
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        self.config.verifier.verify_and_parse(payload, signature)
    }
}
