// Passes - program rewrites that implement ProgramPass

pub mod hoist_schemas;

pub use hoist_schemas::*;
