use std::sync::Arc;

use donation_relay::adapters::http::{build_router, serve, DonationAppState};
use donation_relay::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use donation_relay::application::handlers::donation::default_event_router;
use donation_relay::config::AppConfig;
use donation_relay::domain::donation::VerificationMode;
use donation_relay::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load_validated()?;

    init_tracing(&config.server)?;

    let stripe_config = StripeConfig::from_payment_config(&config.payment)?;
    if stripe_config.verification_mode() == VerificationMode::Disabled {
        tracing::warn!("Webhook signature verification is DISABLED; never run like this in production");
    }
    if config.payment.is_live_mode() && !config.is_production() {
        tracing::warn!(environment = ?config.server.environment, "Using a live Stripe key outside production");
    }

    let processor = StripePaymentAdapter::new(stripe_config)?;
    let event_router = default_event_router();
    let webhook_handlers = event_router.handler_count();
    let state = DonationAppState::new(Arc::new(processor), Arc::new(event_router));
    let router = build_router(state, &config.server);

    tracing::info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        webhook_handlers,
        "Starting donation relay"
    );

    serve(router, config.server.socket_addr()?).await?;
    Ok(())
}
