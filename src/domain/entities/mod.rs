//! Core domain entities.
//!
//! Plain data structures without persistence concerns. Creation inputs are
//! separate structs (`NewLink`, `NewPaste`, `NewClick`).
//!
//! - [`Domain`] - A hostname allowed to serve short links
//! - [`Link`] - A shortened URL mapping
//! - [`Paste`] - A stored text blob with optional expiry
//! - [`Click`] - One entry of the click ledger

pub mod click;
pub mod domain;
pub mod link;
pub mod paste;

pub use click::{Click, ClientInfo, NewClick};
pub use domain::{Domain, DomainRemoval, normalize_hostname};
pub use link::{Link, LinkUpdate, NewLink, PasswordChange};
pub use paste::{ExpiryPolicy, NewPaste, Paste};
