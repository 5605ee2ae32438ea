//! Check command: reports files the pass would change, without writing anything.

use crate::{
    cli::CliConfig,
    commands::common::{transform_file, PassArgs},
    utils::FileUtils,
    CliError, Result,
};
use clap::Args;
use console::style;
use hoist_optimize::HoistReport;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the check command
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Print one JSON report per file that would change
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub pass: PassArgs,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a PathBuf,
    report: &'a HoistReport,
}

/// Outcome of a check run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    /// Files with at least one hoistable schema
    pub changed: Vec<PathBuf>,
    pub hoistable_sites: usize,
}

impl CheckSummary {
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Execute the check command
pub fn check_command(args: CheckArgs, config: &CliConfig) -> Result<CheckSummary> {
    let options = args.pass.resolve(config)?;
    let printer = config.output.printer_config();
    let files = FileUtils::collect_sources(&args.paths, &args.pass.exclude)?;
    let frontend = args.pass.frontend();

    let mut summary = CheckSummary {
        files: files.len(),
        ..CheckSummary::default()
    };

    for file in files {
        let report = transform_file(&frontend, &file, &options, printer)?.report;
        if report.changed() {
            if args.json {
                let line = serde_json::to_string(&FileReport {
                    path: &file,
                    report: &report,
                })
                .map_err(|e| CliError::InvalidInput(e.to_string()))?;
                println!("{line}");
            } else {
                println!(
                    "{} {}: {}",
                    style("✗").red(),
                    file.display(),
                    report.summary()
                );
            }
            summary.hoistable_sites += report.hoisted_sites;
            summary.changed.push(file);
        } else {
            debug!(path = %file.display(), sites = report.sites, "nothing to hoist");
        }
    }

    if summary.is_clean() && !args.json {
        println!(
            "{} {} file(s) checked, nothing to hoist",
            style("✓").green(),
            summary.files
        );
    }
    Ok(summary)
}
