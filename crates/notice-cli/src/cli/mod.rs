//! Command-line interface for notice.

mod commands;
pub mod progress;

pub use commands::{is_verbose, run};
