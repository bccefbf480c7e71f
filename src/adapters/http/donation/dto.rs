//! Request and response bodies for the donation endpoints.
//!
//! Field names are camelCase on the wire to match what the mobile client
//! already sends and reads.

use serde::{Deserialize, Serialize};

use crate::application::handlers::donation::CreatePaymentIntentResult;
use crate::domain::donation::PaymentIntentStatus;

/// Body of `POST /create-payment-intent`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in major units. Numbers and numeric strings are accepted.
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

impl From<CreatePaymentIntentResult> for CreatePaymentIntentResponse {
    fn from(result: CreatePaymentIntentResult) -> Self {
        Self {
            client_secret: result.client_secret,
            payment_intent_id: result.payment_intent_id,
        }
    }
}

/// Body of `GET /payment-intent/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentIntentStatusResponse {
    pub status: PaymentIntentStatus,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_response_uses_camel_case() {
        let response = CreatePaymentIntentResponse {
            client_secret: "pi_1_secret_x".to_string(),
            payment_intent_id: "pi_1".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["clientSecret"], "pi_1_secret_x");
        assert_eq!(json["paymentIntentId"], "pi_1");
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let request: CreatePaymentIntentRequest = serde_json::from_str("{}").unwrap();
        assert!(request.amount.is_null());
        assert!(request.currency.is_none());
    }

    #[test]
    fn status_response_is_plain_string() {
        let response = PaymentIntentStatusResponse {
            status: PaymentIntentStatus::Succeeded,
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"status":"succeeded"}"#
        );
    }
}
