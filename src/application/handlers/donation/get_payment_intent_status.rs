//! GetPaymentIntentStatusHandler - Query handler for a payment intent's status.

use std::sync::Arc;

use crate::domain::donation::{DonationError, PaymentIntentId, PaymentIntentStatus};
use crate::ports::PaymentProcessor;

/// Query for the status of one payment intent.
#[derive(Debug, Clone)]
pub struct GetPaymentIntentStatusQuery {
    /// Raw id from the request path.
    pub intent_id: String,
}

/// Result of successful status query.
pub type GetPaymentIntentStatusResult = PaymentIntentStatus;

/// Handler for reading intent status.
///
/// Every call performs exactly one processor round-trip. Nothing is cached.
pub struct GetPaymentIntentStatusHandler {
    processor: Arc<dyn PaymentProcessor>,
}

impl GetPaymentIntentStatusHandler {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    pub async fn handle(
        &self,
        query: GetPaymentIntentStatusQuery,
    ) -> Result<GetPaymentIntentStatusResult, DonationError> {
        let intent_id = PaymentIntentId::parse(&query.intent_id)?;

        let intent = self
            .processor
            .retrieve_payment_intent(&intent_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    payment_intent_id = %intent_id,
                    error_code = %e.code,
                    "Payment intent lookup failed"
                );
                DonationError::from(e)
            })?;

        tracing::debug!(
            payment_intent_id = %intent_id,
            status = %intent.status,
            terminal = intent.status.is_terminal(),
            "Payment intent status read"
        );

        Ok(intent.status)
    }
}
