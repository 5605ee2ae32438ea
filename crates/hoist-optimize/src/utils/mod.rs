// Utils - per-pass state and the pass interface

pub mod dedup_registry;
pub mod program_pass;

pub use dedup_registry::*;
pub use program_pass::*;
