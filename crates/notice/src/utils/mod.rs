//! Utility modules.

mod pattern;

pub use pattern::{compile, spaced, spaced_ci, spaced_lead, spaced_with, Case};
