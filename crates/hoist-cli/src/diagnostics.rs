//! Diagnostic and error reporting utilities

use crate::{CliError, Result};
use hoist_core::Error;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::Path;
use thiserror::Error;

/// Set up enhanced error reporting with miette
pub fn setup_error_reporting() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .map_err(|e| CliError::Config(format!("Failed to setup error reporting: {}", e)))?;

    Ok(())
}

/// Source-annotated errors shown to the user
#[derive(Error, Debug, Diagnostic)]
pub enum HoistDiagnostic {
    #[error("Syntax error: {message}")]
    #[diagnostic(
        code(schema_hoist::syntax_error),
        help("Files are parsed as modules or scripts; TypeScript is selected by extension")
    )]
    SyntaxError {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        err_span: SourceSpan,
    },
}

/// Build a syntax diagnostic pointing at `range` in `src`.
pub fn syntax_diagnostic(
    path: &Path,
    src: &str,
    message: &str,
    start: usize,
    len: usize,
) -> HoistDiagnostic {
    let start = start.min(src.len());
    let len = len.min(src.len() - start);
    HoistDiagnostic::SyntaxError {
        message: message.to_string(),
        src: NamedSource::new(path.display().to_string(), src.to_string()),
        err_span: (start, len).into(),
    }
}

/// Render errors that carry source context as miette reports.
///
/// Returns `false` when the error has no source context; the caller logs it instead.
pub fn render_cli_error(error: &CliError) -> bool {
    let CliError::Parse { path, src, error } = error else {
        return false;
    };
    let Error::Syntax {
        message,
        range: Some(range),
        ..
    } = error
    else {
        return false;
    };

    let diagnostic = syntax_diagnostic(path, src, message, range.start, range.len);
    eprintln!("{:?}", miette::Report::new(diagnostic));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_core::error::SourceRange;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_syntax_diagnostic_clamps_span() {
        let diagnostic = syntax_diagnostic(Path::new("a.js"), "let x = ", "Unexpected eof", 8, 4);
        match diagnostic {
            HoistDiagnostic::SyntaxError { err_span, .. } => {
                assert_eq!(err_span.offset(), 8);
                assert_eq!(err_span.len(), 0);
            }
        }
    }

    #[test]
    fn test_only_parse_errors_with_ranges_render() {
        assert!(!render_cli_error(&CliError::InvalidInput("x".into())));

        let without_range = CliError::Parse {
            path: PathBuf::from("a.js"),
            src: "(".into(),
            error: Error::syntax("a.js", "Unexpected eof", None),
        };
        assert!(!render_cli_error(&without_range));

        let with_range = CliError::Parse {
            path: PathBuf::from("a.js"),
            src: "(".into(),
            error: Error::syntax(
                "a.js",
                "Unexpected eof",
                Some(SourceRange { start: 1, len: 0 }),
            ),
        };
        assert!(render_cli_error(&with_range));
    }
}
