//! Relay configuration, read from the environment via `config` and `dotenvy`.
//!
//! Variables use the `DONATION_RELAY` prefix with `__` between nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use donation_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.port);
//! ```

mod error;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Built once at startup and handed to the components that need it.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listener, logging and CORS settings. Every field has a default.
    #[serde(default)]
    pub server: ServerConfig,

    /// Stripe credentials and webhook verification.
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Reads `DONATION_RELAY__*` variables (after loading `.env` when one
    /// exists) into typed sections.
    ///
    /// - `DONATION_RELAY__SERVER__PORT=4242` -> `server.port = 4242`
    /// - `DONATION_RELAY__PAYMENT__STRIPE_API_KEY=...` -> `payment.stripe_api_key = ...`
    ///
    /// Fails when the Stripe key is absent or a value does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DONATION_RELAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Loads and validates in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-checks sections; payment rules depend on the environment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate(&self.server.environment)?;

        // A stalled Stripe call must fail before the inbound request does.
        if self.payment.upstream_timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::UpstreamTimeoutNotBelowRequestTimeout {
                upstream_secs: self.payment.upstream_timeout_secs,
                request_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
