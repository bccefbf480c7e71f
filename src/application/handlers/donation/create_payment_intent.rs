//! CreatePaymentIntentHandler - Command handler for starting a donation.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::donation::{Currency, DonationAmount, DonationError, IdempotencyKey};
use crate::ports::{CreatePaymentIntentRequest, PaymentProcessor};

/// Command to create a payment intent for a donation.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentIntentCommand {
    /// Amount in major units, as sent by the client (number or numeric string).
    pub amount: Value,
    /// ISO 4217 code; defaults to usd.
    pub currency: Option<String>,
    /// Raw `Idempotency-Key` header value.
    pub idempotency_key: Option<String>,
}

/// Result of a successful intent creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntentResult {
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// Handler for creating donation payment intents.
///
/// Input is fully validated before the processor is contacted. The processor
/// is called exactly once and never retried here.
pub struct CreatePaymentIntentHandler {
    processor: Arc<dyn PaymentProcessor>,
}

impl CreatePaymentIntentHandler {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, DonationError> {
        let amount = DonationAmount::from_json(&cmd.amount)?;
        let currency = Currency::parse_or_default(cmd.currency.as_deref())?;
        let idempotency_key = cmd
            .idempotency_key
            .as_deref()
            .map(IdempotencyKey::parse)
            .transpose()?;

        let intent = self
            .processor
            .create_payment_intent(CreatePaymentIntentRequest {
                amount,
                currency: currency.clone(),
                idempotency_key,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    amount_minor = amount.minor_units(),
                    currency = %currency,
                    error_code = %e.code,
                    "Payment intent creation failed"
                );
                DonationError::from(e)
            })?;

        let client_secret = intent
            .client_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                DonationError::upstream("Payment intent was created without a client secret")
            })?;

        tracing::info!(
            payment_intent_id = %intent.id,
            amount_minor = amount.minor_units(),
            currency = %currency,
            "Payment intent created"
        );

        Ok(CreatePaymentIntentResult {
            client_secret,
            payment_intent_id: intent.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProcessor;
    use crate::ports::PaymentError;
    use proptest::prelude::*;
    use serde_json::json;

    fn handler_with_mock() -> (CreatePaymentIntentHandler, MockPaymentProcessor) {
        let mock = MockPaymentProcessor::new();
        let handler = CreatePaymentIntentHandler::new(Arc::new(mock.clone()));
        (handler, mock)
    }

    fn command(amount: Value) -> CreatePaymentIntentCommand {
        CreatePaymentIntentCommand {
            amount,
            ..Default::default()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn forwards_amount_in_minor_units_with_default_currency() {
        let (handler, mock) = handler_with_mock();

        let result = handler.handle(command(json!(10))).await.unwrap();

        assert!(!result.client_secret.is_empty());
        assert!(!result.payment_intent_id.is_empty());

        let requests = mock.create_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount.minor_units(), 1000);
        assert_eq!(requests[0].currency.as_str(), "usd");
        assert!(requests[0].idempotency_key.is_none());
    }

    #[tokio::test]
    async fn forwards_explicit_currency_and_idempotency_key() {
        let (handler, mock) = handler_with_mock();

        handler
            .handle(CreatePaymentIntentCommand {
                amount: json!("12.50"),
                currency: Some("EUR".to_string()),
                idempotency_key: Some("donation-7".to_string()),
            })
            .await
            .unwrap();

        let request = &mock.create_requests()[0];
        assert_eq!(request.amount.minor_units(), 1250);
        assert_eq!(request.currency.as_str(), "eur");
        assert_eq!(
            request.idempotency_key.as_ref().map(|k| k.as_str()),
            Some("donation-7")
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn invalid_input_never_reaches_processor() {
        let (handler, mock) = handler_with_mock();

        for cmd in [
            command(json!(0)),
            command(json!(-3)),
            command(json!("abc")),
            command(Value::Null),
            CreatePaymentIntentCommand {
                amount: json!(10),
                currency: Some("jpy".to_string()),
                idempotency_key: None,
            },
            CreatePaymentIntentCommand {
                amount: json!(10),
                currency: None,
                idempotency_key: Some(String::new()),
            },
        ] {
            let err = handler.handle(cmd).await.unwrap_err();
            assert!(err.is_validation(), "{:?}", err);
        }

        assert_eq!(mock.upstream_call_count(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn processor_error_message_passes_through() {
        let (handler, mock) = handler_with_mock();
        mock.set_error(PaymentError::invalid_request(
            "Amount must be at least $0.50 usd",
        ));

        let err = handler.handle(command(json!(0.1))).await.unwrap_err();

        assert_eq!(
            err,
            DonationError::Upstream {
                message: "Amount must be at least $0.50 usd".to_string(),
                retryable: false,
            }
        );
        assert_eq!(mock.call_count("create_payment_intent"), 1);
    }

    proptest! {
        #[test]
        fn processor_receives_one_hundred_times_the_amount(major in 1i64..=999_999) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (handler, mock) = handler_with_mock();

            runtime.block_on(handler.handle(command(json!(major)))).unwrap();

            prop_assert_eq!(mock.create_requests()[0].amount.minor_units(), major * 100);
        }

        #[test]
        fn non_positive_amounts_make_no_processor_call(major in -1_000_000i64..=0) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (handler, mock) = handler_with_mock();

            let result = runtime.block_on(handler.handle(command(json!(major))));

            prop_assert!(result.is_err());
            prop_assert_eq!(mock.upstream_call_count(), 0);
        }
    }
}
