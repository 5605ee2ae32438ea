#[macro_use]
pub mod macros;

pub mod config;
pub mod error;

// Re-export commonly used items for convenience
pub use eyre;
pub use tracing;

pub use config::{HoistOptions, InsertionPoint};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
