//! Hoist command: rewrites files and writes the result.

use crate::{
    cli::CliConfig,
    commands::common::{transform_file, PassArgs},
    utils::FileUtils,
    CliError, Result,
};
use clap::Args;
use console::style;
use std::path::{Path, PathBuf};

/// Arguments for the hoist command
#[derive(Debug, Clone, Args)]
pub struct HoistArgs {
    /// Input files or directories
    #[arg(required = true)]
    pub input: Vec<PathBuf>,

    /// Output file, or output directory when several files are processed
    #[arg(short, long, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Rewrite the input files
    #[arg(long)]
    pub in_place: bool,

    /// Emit minified code
    #[arg(long)]
    pub minify: bool,

    #[command(flatten)]
    pub pass: PassArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
    InPlace,
}

impl Destination {
    fn choose(args: &HoistArgs, file_count: usize) -> Result<Self> {
        if args.in_place {
            return Ok(Destination::InPlace);
        }
        match &args.output {
            Some(output) if file_count == 1 && !output.is_dir() => {
                Ok(Destination::File(output.clone()))
            }
            Some(output) => Ok(Destination::Directory(output.clone())),
            None if file_count == 1 => Ok(Destination::Stdout),
            None => Err(CliError::InvalidInput(
                "several input files need --output <DIR> or --in-place".to_string(),
            )),
        }
    }
}

/// Execute the hoist command
pub fn hoist_command(args: HoistArgs, config: &CliConfig) -> Result<()> {
    let options = args.pass.resolve(config)?;
    let mut printer = config.output.printer_config();
    printer.minify |= args.minify;

    let files = FileUtils::collect_sources(&args.input, &args.pass.exclude)?;
    if files.is_empty() {
        return Err(CliError::InvalidInput(
            "no JavaScript or TypeScript sources found".to_string(),
        ));
    }
    let destination = Destination::choose(&args, files.len())?;
    let frontend = args.pass.frontend();

    for file in &files {
        let output = transform_file(&frontend, file, &options, printer)?;
        let report = &output.report;

        match &destination {
            Destination::Stdout => print!("{}", output.code),
            Destination::File(path) => FileUtils::write_file(path, &output.code)?,
            Destination::Directory(dir) => {
                let target = dir.join(relative_to_inputs(file, &args.input));
                FileUtils::write_file(&target, &output.code)?;
            }
            Destination::InPlace => {
                if report.changed() {
                    FileUtils::write_file(file, &output.code)?;
                }
            }
        }

        let marker = if report.changed() {
            style("✓").green()
        } else {
            style("·").dim()
        };
        eprintln!("{} {}: {}", marker, file.display(), report.summary());
    }

    Ok(())
}

/// Path of `file` below the input directory it was found in, or its file name.
fn relative_to_inputs(file: &Path, inputs: &[PathBuf]) -> PathBuf {
    inputs
        .iter()
        .filter(|input| input.is_dir())
        .find_map(|input| file.strip_prefix(input).ok())
        .map(Path::to_path_buf)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| file.to_path_buf())
}
