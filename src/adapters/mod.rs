//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum server exposing the donation endpoints
//! - `stripe` - Stripe API client and an in-memory test double

pub mod http;
pub mod stripe;
