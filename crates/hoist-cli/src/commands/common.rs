//! Helpers shared by the `hoist` and `check` commands.

use crate::{cli::CliConfig, CliError, Result};
use clap::{Args, ValueEnum};
use hoist_core::{HoistOptions, InsertionPoint};
use hoist_javascript::{JsFrontend, ParseMode, PrinterConfig};
use hoist_optimize::{hoist_source_with, HoistOutput};
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InsertArg {
    /// Before every top-level statement
    Start,
    /// After the leading import declarations
    AfterImports,
}

impl From<InsertArg> for InsertionPoint {
    fn from(value: InsertArg) -> Self {
        match value {
            InsertArg::Start => InsertionPoint::ProgramStart,
            InsertArg::AfterImports => InsertionPoint::AfterImports,
        }
    }
}

/// Pass flags; each one overrides the configuration file when given.
#[derive(Debug, Clone, Default, Args)]
pub struct PassArgs {
    /// Namespace identifier whose call chains are hoisted
    #[arg(long)]
    pub namespace: Option<String>,

    /// Stem of the generated declaration names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Where the hoisted declarations are inserted
    #[arg(long, value_enum)]
    pub insert: Option<InsertArg>,

    /// Exclude patterns (glob) applied while walking directories
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Log recoverable parse errors instead of failing the file
    #[arg(long)]
    pub loose: bool,
}

impl PassArgs {
    pub fn resolve(&self, config: &CliConfig) -> Result<HoistOptions> {
        let mut options = config.hoist.clone();
        if let Some(namespace) = &self.namespace {
            options = options.with_namespace(namespace.clone());
        }
        if let Some(prefix) = &self.prefix {
            options = options.with_name_prefix(prefix.clone());
        }
        if let Some(insert) = self.insert {
            options = options.with_insertion(insert.into());
        }
        options
            .validate()
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
        Ok(options)
    }

    pub fn frontend(&self) -> JsFrontend {
        if self.loose {
            JsFrontend::new(ParseMode::Loose)
        } else {
            JsFrontend::new(ParseMode::Strict)
        }
    }
}

/// Read and transform one file. Parse failures keep the source for diagnostics.
pub fn transform_file(
    frontend: &JsFrontend,
    path: &Path,
    options: &HoistOptions,
    printer: PrinterConfig,
) -> Result<HoistOutput> {
    let source = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = source.len(), "transforming file");

    match hoist_source_with(frontend, &source, Some(path), options, printer) {
        Ok(output) => Ok(output),
        Err(error) if error.is_syntax() => Err(CliError::Parse {
            path: path.to_path_buf(),
            src: source,
            error,
        }),
        Err(error) => Err(CliError::Transform(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_config() {
        let config = CliConfig::default();
        let args = PassArgs {
            namespace: Some("v".into()),
            insert: Some(InsertArg::AfterImports),
            ..PassArgs::default()
        };
        let options = args.resolve(&config).unwrap();
        assert_eq!(options.namespace, "v");
        assert_eq!(options.name_prefix, "schema");
        assert_eq!(options.insertion, InsertionPoint::AfterImports);
    }

    #[test]
    fn test_loose_flag_selects_parse_mode() {
        assert_eq!(PassArgs::default().frontend().parse_mode(), ParseMode::Strict);
        let args = PassArgs {
            loose: true,
            ..PassArgs::default()
        };
        assert_eq!(args.frontend().parse_mode(), ParseMode::Loose);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let args = PassArgs {
            prefix: Some("1x".into()),
            ..PassArgs::default()
        };
        assert!(matches!(
            args.resolve(&CliConfig::default()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
