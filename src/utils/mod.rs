//! Utility functions for slug generation, URL validation, and request handling.
//!
//! - [`slug`] - Slug generation and custom slug validation
//! - [`url_validator`] - Destination URL checks
//! - [`extract_domain`] - Host and client address extraction from HTTP headers

pub mod extract_domain;
pub mod slug;
pub mod url_validator;
