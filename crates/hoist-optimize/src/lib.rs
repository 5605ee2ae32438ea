// hoist-optimize: the schema hoisting pass
//
// Architecture:
// - passes: program passes implementing ProgramPass
// - queries: stateless reads over the syntax tree (chains, scopes, hoist safety)
// - utils: shared per-pass state (dedup registry, name generation) and the pass trait
// - pipeline: parse -> hoist -> print for a single source text

pub mod error;
pub mod passes;
pub mod pipeline;
pub mod queries;
pub mod report;
pub mod utils;

// Re-export key types for convenience
pub use passes::*;
pub use pipeline::{hoist_source, hoist_source_with, HoistOutput};
pub use report::{HoistReport, RejectedSite, Rejection};
pub use utils::*;
