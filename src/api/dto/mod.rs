//! Data Transfer Objects for API requests and responses.
//!
//! Wire names are camelCase. Request bodies are checked with `validator`
//! before any service is called.

pub mod auth;
pub mod click;
pub mod domain;
pub mod health;
pub mod link;
pub mod paste;

use serde::Serialize;

/// Plain acknowledgement body, e.g. `{"message": "Domain added successfully."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
