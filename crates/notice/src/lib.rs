//! notice - public notice field extraction.
//!
//! Core library exposing the record model, dialect table, collaborator
//! traits and settings shared by the workspace crates.

// Model types use `from_str` methods that return Option<Self>,
// not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod models;
pub mod sources;
pub mod utils;
