use std::path::Path;
use std::sync::Arc;

use hoist_core::error::Result;
use hoist_core::HoistOptions;
use hoist_javascript::{CanonicalPrinter, JsFrontend, JsPrinter, PrinterConfig};
use serde::Serialize;

use crate::passes::HoistSchemasPass;
use crate::report::HoistReport;
use crate::utils::ProgramPass;

/// Printed program and what the pass did to it.
#[derive(Debug, Clone, Serialize)]
pub struct HoistOutput {
    pub code: String,
    pub report: HoistReport,
}

/// Parses `source`, hoists its schemas and prints the result.
///
/// `path` only selects the syntax (by extension) and names the file in errors.
pub fn hoist_source(
    source: &str,
    path: Option<&Path>,
    options: &HoistOptions,
    printer: PrinterConfig,
) -> Result<HoistOutput> {
    hoist_source_with(&JsFrontend::default(), source, path, options, printer)
}

/// [`hoist_source`] with a caller-configured frontend (e.g. loose parsing).
pub fn hoist_source_with(
    frontend: &JsFrontend,
    source: &str,
    path: Option<&Path>,
    options: &HoistOptions,
    printer: PrinterConfig,
) -> Result<HoistOutput> {
    let mut parsed = frontend.parse(source, path)?;

    let pass = HoistSchemasPass::new(Arc::new(CanonicalPrinter), options.clone())
        .with_typescript(parsed.typescript);
    let report = pass.run(&mut parsed.program)?;

    let code = JsPrinter::for_parsed(&parsed, printer).print_program(&parsed.program)?;
    Ok(HoistOutput { code, report })
}
