//! Mock payment processor for testing.
//!
//! In-memory implementation of `PaymentProcessor` for unit and integration
//! tests. Supports:
//! - Pre-configured payment intents
//! - Error injection
//! - Call tracking
//!
//! Webhook verification is delegated to a real `WebhookVerifier`, so signed
//! fixtures behave exactly as they would against the Stripe adapter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::donation::{
    PaymentIntentId, PaymentIntentStatus, WebhookError, WebhookEvent, WebhookVerifier,
};
use crate::ports::{CreatePaymentIntentRequest, PaymentError, PaymentIntent, PaymentProcessor};

/// Mock payment processor for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProcessor::new();
/// mock.add_intent(PaymentIntent { id: "pi_123".into(), ... });
/// mock.set_method_error("create_payment_intent", PaymentError::provider("boom"));
/// assert_eq!(mock.call_count("retrieve_payment_intent"), 1);
/// ```
#[derive(Clone)]
pub struct MockPaymentProcessor {
    inner: Arc<Mutex<MockState>>,
    verifier: WebhookVerifier,
}

#[derive(Default)]
struct MockState {
    /// Known intents by id.
    intents: HashMap<String, PaymentIntent>,

    /// Requests received by `create_payment_intent`, in order.
    create_requests: Vec<CreatePaymentIntentRequest>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    next_id: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl Default for MockPaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProcessor {
    /// Create a mock that accepts unsigned webhooks.
    pub fn new() -> Self {
        Self::with_verifier(WebhookVerifier::disabled())
    }

    /// Create a mock that checks webhook signatures with the given verifier.
    pub fn with_verifier(verifier: WebhookVerifier) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
            verifier,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add an intent to the "database".
    pub fn add_intent(&self, intent: PaymentIntent) {
        self.state().intents.insert(intent.id.clone(), intent);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Total number of upstream calls (everything except webhook verification).
    pub fn upstream_call_count(&self) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method != "verify_webhook")
            .count()
    }

    /// Requests received by `create_payment_intent`.
    pub fn create_requests(&self) -> Vec<CreatePaymentIntentRequest> {
        self.state().create_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![
                request.amount.minor_units().to_string(),
                request.currency.to_string(),
            ],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.state();
        state.next_id += 1;
        let id = format!("pi_mock_{}", state.next_id);
        let intent = PaymentIntent {
            id: id.clone(),
            client_secret: Some(format!("{}_secret_mock", id)),
            status: PaymentIntentStatus::RequiresPaymentMethod,
            amount: request.amount.minor_units(),
            currency: request.currency.to_string(),
        };

        state.intents.insert(id, intent.clone());
        state.create_requests.push(request);

        Ok(intent)
    }

    async fn retrieve_payment_intent(
        &self,
        intent_id: &PaymentIntentId,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call("retrieve_payment_intent", vec![intent_id.to_string()]);
        self.check_error("retrieve_payment_intent")?;

        self.state()
            .intents
            .get(intent_id.as_str())
            .cloned()
            .ok_or_else(|| {
                PaymentError::not_found(format!("No such payment_intent: '{}'", intent_id))
                    .with_provider_code("resource_missing")
            })
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        self.record_call("verify_webhook", vec![signature.unwrap_or_default().to_string()]);
        self.verifier.verify_and_parse(payload, signature)
    }
}
