//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `donation` - Donation amounts, payment intent status, webhook verification and dispatch

pub mod donation;
