//! HTTP middleware for request processing and protection.
//!
//! Provides the admin auth gate, credential rate limiting and request tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
