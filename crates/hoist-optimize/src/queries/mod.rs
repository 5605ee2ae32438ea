// Queries - stateless reads over the syntax tree used by the hoisting pass

pub mod chain_queries;
pub mod hoist_safety;
pub mod scope_queries;

pub use chain_queries::*;
pub use hoist_safety::*;
pub use scope_queries::*;
