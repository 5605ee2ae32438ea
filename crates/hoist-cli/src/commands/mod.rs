//! Command implementations for the schema-hoist CLI

pub mod check;
pub mod common;
pub mod hoist;

// Re-export command functions
pub use check::check_command;
pub use hoist::hoist_command;
