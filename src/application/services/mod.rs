//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_service;
pub mod domain_service;
pub mod link_service;
pub mod paste_service;
pub mod redirect_service;
pub mod slug_allocator;

pub use auth_service::AuthService;
pub use click_service::ClickService;
pub use domain_service::DomainService;
pub use link_service::{CreateLink, LinkService, UpdateLink};
pub use paste_service::{CreatePaste, PasteService};
pub use redirect_service::{RedirectService, Resolution};
pub use slug_allocator::{SlugAllocator, SlugTarget};
