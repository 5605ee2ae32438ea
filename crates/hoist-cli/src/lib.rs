//! schema-hoist CLI library
//!
//! Drives the hoisting pass over files on disk: configuration loading, file
//! discovery, output placement and diagnostics.

pub mod cli;
pub mod commands;
pub mod diagnostics;
pub mod utils;

// CLI-specific error handling
pub mod error {
    use std::path::PathBuf;

    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error("{0}")]
        Transform(#[from] hoist_core::Error),

        /// A source file failed to parse; keeps the text for diagnostics.
        #[error("{error}")]
        Parse {
            path: PathBuf,
            src: String,
            #[source]
            error: hoist_core::Error,
        },

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("{0} file(s) contain hoistable schemas")]
        Unhoisted(usize),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
