//! CLI configuration and settings management

use crate::{CliError, Result};
use hoist_core::HoistOptions;
use hoist_javascript::PrinterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = "schema-hoist.toml";

/// CLI configuration loaded from config files and environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Pass settings
    pub hoist: HoistOptions,

    /// Printer settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit minified code
    pub minify: bool,

    /// Carry comments of the input into the output
    pub keep_comments: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            minify: false,
            keep_comments: true,
        }
    }
}

impl OutputConfig {
    pub fn printer_config(&self) -> PrinterConfig {
        PrinterConfig {
            minify: self.minify,
            keep_comments: self.keep_comments,
        }
    }
}

impl CliConfig {
    /// Load configuration from file, falling back to defaults.
    ///
    /// Without an explicit path the user config directory is read first and
    /// `schema-hoist.toml` in the working directory replaces it when present.
    /// `SCHEMA_HOIST_*` environment variables apply last.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            let mut config = Self::default();

            if let Some(user_config) = Self::default_config_path() {
                if user_config.is_file() {
                    config = config.merge(Self::load_from_file(&user_config)?);
                }
            }

            let local_config = Path::new(LOCAL_CONFIG_FILE);
            if local_config.is_file() {
                config = config.merge(Self::load_from_file(local_config)?);
            }

            config
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config
            .hoist
            .validate()
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// The more specific file wins as a whole.
    pub fn merge(self, other: Self) -> Self {
        other
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.hoist = self.hoist.with_overrides(lookup);
        self
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("schema-hoist").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_core::config::NAMESPACE_ENV;
    use hoist_core::InsertionPoint;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.hoist.namespace, "z");
        assert_eq!(config.output.printer_config(), PrinterConfig::pretty());
    }

    #[test]
    fn test_config_file_tables() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[hoist]
namespace = "s"
insertion = "after-imports"

[output]
minify = true
"#
        )
        .unwrap();

        let config = CliConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.hoist.namespace, "s");
        assert_eq!(config.hoist.name_prefix, "schema");
        assert_eq!(config.hoist.insertion, InsertionPoint::AfterImports);
        assert!(config.output.minify);
        assert!(config.output.keep_comments);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[hoist]\nnamespace = \"a-b\"").unwrap();
        let err = CliConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let config = CliConfig::default().with_env_overrides(|key| {
            (key == NAMESPACE_ENV).then(|| "schemas".to_string())
        });
        assert_eq!(config.hoist.namespace, "schemas");
    }
}
