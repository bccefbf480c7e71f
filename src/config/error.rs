//! Startup configuration failures

use thiserror::Error;

/// Loading or checking the configuration failed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value is unusable
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid timeout")]
    InvalidTimeout,

    #[error("Stripe timeout ({upstream_secs}s) must be shorter than the request timeout ({request_secs}s)")]
    UpstreamTimeoutNotBelowRequestTimeout { upstream_secs: u64, request_secs: u64 },

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Webhook verification cannot be disabled in production")]
    VerificationDisabledInProduction,

    #[error("Webhook tolerance must be positive")]
    InvalidWebhookTolerance,

    #[error("Invalid Stripe API base URL")]
    InvalidApiBaseUrl,

    #[error("Stripe API base URL must use HTTPS in production")]
    ApiBaseUrlMustBeHttps,
}
