//! Command handlers.

pub mod console;
pub mod lint;
pub mod run;
