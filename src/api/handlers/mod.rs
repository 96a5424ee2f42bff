//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod domains;
pub mod health;
pub mod links;
pub mod pastes;

pub use auth::{login_handler, logout_handler, verify_password_handler};
pub use domains::{add_domain_handler, list_domains_handler, remove_domain_handler};
pub use health::health_handler;
pub use links::{
    delete_link_handler, link_details_handler, list_links_handler, shorten_handler,
    update_link_handler,
};
pub use pastes::{
    create_paste_handler, delete_paste_handler, get_paste_handler, list_pastes_handler,
};
