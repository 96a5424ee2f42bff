//! Browser-facing layer: short link redirects, paste view, password prompt
//! and the dashboard shell.
//!
//! Failures here render HTML pages or plain text, never JSON.
//!
//! # Modules
//!
//! - [`handlers`] - Redirect and Askama page handlers
//! - [`error`] - HTML failure pages
//! - [`routes`] - Browser route configuration

pub mod error;
pub mod handlers;
pub mod routes;
