//! Shared building blocks for the SQL bridge.
//!
//! - [`config`]: environment-driven service configuration
//! - [`errors`]: typed error with its HTTP mapping
//! - [`models`]: request envelope and execution outcomes
//! - [`response`]: per-endpoint response bodies
//! - [`middleware`]: request ID tagging

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
