//! HTML and redirect handlers for the browser-facing surfaces.

mod password;
mod paste;
mod redirect;

pub use password::{password_prompt_handler, submit_password_handler};
pub use paste::{unlock_paste_handler, view_paste_handler};
pub use redirect::{redirect_handler, serve_dashboard};
