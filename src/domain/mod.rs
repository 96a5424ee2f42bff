//! Domain layer containing business entities and repository contracts.
//!
//! Nothing here depends on the infrastructure or HTTP layers.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod repositories;
