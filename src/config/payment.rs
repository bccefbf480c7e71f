//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::domain::donation::VerificationMode;

/// Stripe credentials and webhook policy
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Endpoint signing secret (`whsec_...`); required when verification is enforced
    #[serde(default)]
    pub stripe_webhook_secret: Option<SecretString>,

    /// Whether webhook signatures are checked
    #[serde(default)]
    pub webhook_verification: VerificationMode,

    /// Maximum accepted age of a signed webhook, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Base URL for the Stripe API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout applied to every outbound Stripe call, in seconds
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
}

impl PaymentConfig {
    /// The Stripe secret key, exposed for the adapter that sends it.
    pub fn api_key(&self) -> &str {
        self.stripe_api_key.expose_secret()
    }

    /// Key targets the Stripe sandbox
    pub fn is_test_mode(&self) -> bool {
        self.api_key().starts_with("sk_test_") || self.api_key().starts_with("rk_test_")
    }

    /// Key moves real money
    pub fn is_live_mode(&self) -> bool {
        self.api_key().starts_with("sk_live_") || self.api_key().starts_with("rk_live_")
    }

    /// The webhook secret, treating an empty value as unset
    pub fn webhook_secret(&self) -> Option<&str> {
        self.stripe_webhook_secret
            .as_ref()
            .map(|s| s.expose_secret().trim())
            .filter(|s| !s.is_empty())
    }

    /// Rejects unusable keys and unsafe verification settings for `environment`
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let api_key = self.api_key();
        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }

        if !(api_key.starts_with("sk_") || api_key.starts_with("rk_")) {
            return Err(ValidationError::InvalidStripeKey);
        }

        match (self.webhook_verification, self.webhook_secret()) {
            (VerificationMode::Enforced, None) => {
                return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
            }
            (VerificationMode::Disabled, _) if *environment == Environment::Production => {
                return Err(ValidationError::VerificationDisabledInProduction);
            }
            _ => {}
        }

        if let Some(secret) = self.webhook_secret() {
            if !secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }

        if self.webhook_tolerance_secs <= 0 {
            return Err(ValidationError::InvalidWebhookTolerance);
        }

        if self.upstream_timeout_secs == 0 || self.upstream_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }

        let https = self.api_base_url.starts_with("https://");
        if !https && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        if !https && *environment == Environment::Production {
            return Err(ValidationError::ApiBaseUrlMustBeHttps);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: SecretString::new(String::new()),
            stripe_webhook_secret: None,
            webhook_verification: VerificationMode::default(),
            webhook_tolerance_secs: default_webhook_tolerance(),
            api_base_url: default_api_base_url(),
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_webhook_tolerance() -> i64 {
    300
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_upstream_timeout() -> u64 {
    10
}
