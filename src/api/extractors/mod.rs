//! Custom Axum extractors.

pub mod client;
pub mod json;

pub use client::{Client, RequestHost};
pub use json::{ApiJson, ApiQuery};
