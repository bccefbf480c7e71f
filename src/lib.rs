//! Donation Relay - payment-intent broker between the donation client and Stripe.
//!
//! Creates payment intents, reports their status, and verifies the signed
//! webhooks Stripe sends back.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
