//! Integration tests for the hoist and check commands

use std::fs;
use std::path::Path;

use hoist_cli::cli::CliConfig;
use hoist_cli::commands::check::{check_command, CheckArgs};
use hoist_cli::commands::common::PassArgs;
use hoist_cli::commands::hoist::{hoist_command, HoistArgs};
use hoist_cli::CliError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const FORM: &str = r#"import { z } from "zod";

export function contactSchema() {
  return z.object({ email: z.string().email() });
}
"#;

const CLEAN: &str = r#"import { z } from "zod";

export const contact = z.object({ email: z.string().email() });
"#;

fn hoist_args(input: &Path) -> HoistArgs {
    HoistArgs {
        input: vec![input.to_path_buf()],
        output: None,
        in_place: false,
        minify: false,
        pass: PassArgs::default(),
    }
}

fn check_args(path: &Path) -> CheckArgs {
    CheckArgs {
        paths: vec![path.to_path_buf()],
        json: false,
        pass: PassArgs::default(),
    }
}

#[test]
fn test_hoist_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("form.js");
    let output = temp_dir.path().join("out/form.js");
    fs::write(&input, FORM).unwrap();

    let args = HoistArgs {
        output: Some(output.clone()),
        ..hoist_args(&input)
    };
    hoist_command(args, &CliConfig::default()).unwrap();

    let code = fs::read_to_string(&output).unwrap();
    assert!(code.contains("const _schema = z.object"));
    assert!(code.contains("return _schema;"));
    assert_eq!(fs::read_to_string(&input).unwrap(), FORM);
}

#[test]
fn test_hoist_in_place_then_check_is_clean() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("forms")).unwrap();
    fs::write(src.join("forms/contact.ts"), FORM).unwrap();
    fs::write(src.join("clean.js"), CLEAN).unwrap();

    let before = check_command(check_args(&src), &CliConfig::default()).unwrap();
    assert_eq!(before.files, 2);
    assert_eq!(before.changed, vec![src.join("forms/contact.ts")]);
    assert_eq!(before.hoistable_sites, 1);

    let args = HoistArgs {
        in_place: true,
        ..hoist_args(&src)
    };
    hoist_command(args, &CliConfig::default()).unwrap();
    assert_eq!(fs::read_to_string(src.join("clean.js")).unwrap(), CLEAN);

    let after = check_command(check_args(&src), &CliConfig::default()).unwrap();
    assert!(after.is_clean());
}

#[test]
fn test_hoist_directory_output_mirrors_layout() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("dist");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("a.js"), FORM).unwrap();
    fs::write(src.join("nested/b.js"), FORM).unwrap();

    let args = HoistArgs {
        output: Some(out.clone()),
        ..hoist_args(&src)
    };
    hoist_command(args, &CliConfig::default()).unwrap();

    assert!(out.join("a.js").is_file());
    assert!(out.join("nested/b.js").is_file());
}

#[test]
fn test_config_namespace_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("form.js");
    fs::write(&input, FORM.replace("z.", "v.")).unwrap();

    let mut config = CliConfig::default();
    config.hoist.namespace = "v".to_string();
    let summary = check_command(check_args(&input), &config).unwrap();
    assert_eq!(summary.hoistable_sites, 1);

    let summary = check_command(check_args(&input), &CliConfig::default()).unwrap();
    assert!(summary.is_clean());
}

#[test]
fn test_syntax_errors_keep_source_context() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("broken.js");
    fs::write(&input, "function f( { return z.string(); }").unwrap();

    let err = check_command(check_args(&input), &CliConfig::default()).unwrap_err();
    match err {
        CliError::Parse { path, src, error } => {
            assert_eq!(path, input);
            assert!(src.starts_with("function f("));
            assert!(error.is_syntax());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_multiple_inputs_need_a_destination() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.js"), FORM).unwrap();
    fs::write(temp_dir.path().join("b.js"), FORM).unwrap();

    let err = hoist_command(hoist_args(temp_dir.path()), &CliConfig::default()).unwrap_err();
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[test]
fn test_json_check_reports_the_same_summary() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("form.js");
    fs::write(&input, FORM).unwrap();

    let args = CheckArgs {
        json: true,
        ..check_args(&input)
    };
    let json = check_command(args, &CliConfig::default()).unwrap();
    let plain = check_command(check_args(&input), &CliConfig::default()).unwrap();
    assert_eq!(json, plain);
}
