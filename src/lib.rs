//! Drive an interactive R console from a script buffer.
//!
//! Code is sent to R as literal input lines; there is no channel back. The
//! data-frame preview therefore has R export to a scratch CSV and watches the
//! file's size from outside until it stops growing (see [`poll`]).

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod events;
pub mod extension;
pub mod handlers;
pub mod host;
pub mod integration;
pub mod lint;
pub mod poll;
pub mod preview;
pub mod printer;
pub mod process;
pub mod scratch;
pub mod utils;

pub use extension::Extension;
