//! service-core: Shared infrastructure for the chivalry services.
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod observability;

