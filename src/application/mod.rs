//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI one place for validation and business rules.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Admin secret, session tokens, password hashes
//! - [`services::slug_allocator::SlugAllocator`] - Bounded, collision-safe slug allocation
//! - [`services::domain_service::DomainService`] - Domain registry
//! - [`services::link_service::LinkService`] - Short link CRUD
//! - [`services::paste_service::PasteService`] - Pastes with lazy expiry
//! - [`services::click_service::ClickService`] - Click ledger
//! - [`services::redirect_service::RedirectService`] - Redirect resolution pipeline

pub mod services;
