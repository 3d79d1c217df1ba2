//! Utilities (R literal quoting, selection extraction).

pub mod quote;
pub mod selection;

pub use quote::{quote_path, quote_r};
pub use selection::{current_selection_text, is_comment_line};
