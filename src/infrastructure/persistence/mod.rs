//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx
//! runtime queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgDomainRepository`] - Registered hostnames
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgPasteRepository`] - Paste storage and expiry purge
//! - [`PgClickRepository`] - Click ledger

pub mod pg_click_repository;
pub mod pg_domain_repository;
pub mod pg_link_repository;
pub mod pg_paste_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_domain_repository::PgDomainRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_paste_repository::PgPasteRepository;
