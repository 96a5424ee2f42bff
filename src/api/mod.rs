//! JSON API layer.
//!
//! Translates HTTP requests into service calls and formats responses as
//! camelCase JSON. Errors are always `{"error": "..."}`.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`extractors`] - Body, query, client and host extractors
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Auth gate, rate limiting, tracing
//! - [`routes`] - Route table, classification and router

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
