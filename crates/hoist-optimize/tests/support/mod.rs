//! Shared helpers for the hoisting integration tests.
//!
//! Outputs are compared through the compact printer so layout and quoting in the
//! expected sources do not matter.

#![allow(dead_code)]

use std::path::Path;

use hoist_core::{HoistOptions, Result};
use hoist_javascript::{JsFrontend, JsPrinter, PrinterConfig};
use hoist_optimize::{hoist_source, HoistOutput};

pub fn hoist(source: &str) -> Result<HoistOutput> {
    hoist_with(source, None, &HoistOptions::default())
}

pub fn hoist_with(
    source: &str,
    path: Option<&Path>,
    options: &HoistOptions,
) -> Result<HoistOutput> {
    hoist_source(source, path, options, PrinterConfig::compact())
}

/// `source` printed the same way [`hoist`] prints its output.
pub fn normalize(source: &str) -> Result<String> {
    normalize_at(source, None)
}

pub fn normalize_at(source: &str, path: Option<&Path>) -> Result<String> {
    let parsed = JsFrontend::default().parse(source, path)?;
    JsPrinter::for_parsed(&parsed, PrinterConfig::compact()).print_program(&parsed.program)
}

/// Asserts that hoisting `source` yields `expected` and returns the report.
pub fn assert_hoists_to(source: &str, expected: &str) -> Result<HoistOutput> {
    let output = hoist(source)?;
    pretty_assertions::assert_eq!(output.code, normalize(expected)?);
    Ok(output)
}

/// Asserts that hoisting leaves `source` unchanged apart from formatting.
pub fn assert_unchanged(source: &str) -> Result<HoistOutput> {
    let output = hoist(source)?;
    pretty_assertions::assert_eq!(output.code, normalize(source)?);
    assert!(!output.report.changed());
    Ok(output)
}
