//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`DomainRepository`] - Registered hostnames
//! - [`LinkRepository`] - Short link CRUD operations
//! - [`PasteRepository`] - Paste storage with expiry
//! - [`ClickRepository`] - Click ledger and counter

pub mod click_repository;
pub mod domain_repository;
pub mod link_repository;
pub mod paste_repository;

pub use click_repository::ClickRepository;
pub use domain_repository::DomainRepository;
pub use link_repository::LinkRepository;
pub use paste_repository::PasteRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use domain_repository::MockDomainRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use paste_repository::MockPasteRepository;
