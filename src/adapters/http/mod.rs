//! HTTP adapters - REST API implementations.

pub mod donation;
mod server;

// Re-export key types for convenience
pub use donation::{donation_router, DonationAppState};
pub use server::{build_router, serve};
