//! File and path utilities

use crate::{CliError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when a directory is given as input.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Utilities for working with files and paths
pub struct FileUtils;

impl FileUtils {
    /// Expand `inputs` into source files: files are taken as given, directories are
    /// walked for JavaScript/TypeScript sources. Paths matching `exclude` are dropped.
    pub fn collect_sources(inputs: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>> {
        let exclude_set = Self::build_glob_set(exclude)?;
        let mut files = Vec::new();

        for input in inputs {
            if input.is_file() {
                if !exclude_set.is_match(input) {
                    files.push(input.clone());
                }
                continue;
            }
            if !input.is_dir() {
                return Err(CliError::InvalidInput(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }

            let walker = WalkDir::new(input)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !Self::is_skipped_dir(entry.path()));
            for entry in walker {
                let entry = entry.map_err(|e| CliError::Io(e.into()))?;
                let path = entry.path();
                if !entry.file_type().is_file() || !Self::is_source_file(path) {
                    continue;
                }

                let relative_path = path.strip_prefix(input).map_err(|_| {
                    CliError::InvalidInput("Invalid path structure".to_string())
                })?;
                if exclude_set.is_match(relative_path) || exclude_set.is_match(path) {
                    continue;
                }
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if a file has a JavaScript or TypeScript extension
    pub fn is_source_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                SOURCE_EXTENSIONS
                    .iter()
                    .any(|candidate| ext.eq_ignore_ascii_case(candidate))
            })
    }

    fn is_skipped_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| SKIPPED_DIRS.contains(&name))
    }

    /// Write content to a file, creating parent directories if necessary
    pub fn write_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build a GlobSet from a list of patterns
    fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                CliError::InvalidInput(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| CliError::InvalidInput(format!("Failed to build glob set: {}", e)))
    }
}
