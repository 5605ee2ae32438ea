use std::path::{Path, PathBuf};
use std::sync::RwLock;

use hoist_core::error::{Error, Result, SourceRange};
use hoist_core::warn;
use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::input::StringInput;
use swc_core::common::{sync::Lrc, FileName, SourceFile, SourceMap, Span, Spanned};
use swc_core::ecma::ast::{EsVersion, Program};
use swc_core::ecma::parser::error::Error as SwcError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, Syntax, TsSyntax};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Any recoverable parse error fails the file.
    #[default]
    Strict,
    /// Recoverable parse errors are logged and the recovered tree is used.
    Loose,
}

const TYPESCRIPT_EXTENSIONS: &[&str] = &["ts", "mts", "cts", "tsx"];
const ANONYMOUS_FILE: &str = "<input>";

/// A parsed program together with the source map and comments the printer needs.
pub struct ParsedProgram {
    pub program: Program,
    pub source_map: Lrc<SourceMap>,
    pub comments: SingleThreadedComments,
    pub path: PathBuf,
    pub typescript: bool,
}

pub struct JsFrontend {
    parse_mode: RwLock<ParseMode>,
}

impl JsFrontend {
    pub fn new(parse_mode: ParseMode) -> Self {
        Self {
            parse_mode: RwLock::new(parse_mode),
        }
    }

    fn file_name(path: Option<&Path>) -> FileName {
        match path {
            Some(path) => FileName::Real(path.to_path_buf()),
            None => FileName::Custom(ANONYMOUS_FILE.into()),
        }
    }

    fn file_path(path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(ANONYMOUS_FILE))
    }

    pub fn set_parse_mode(&self, mode: ParseMode) {
        if let Ok(mut guard) = self.parse_mode.write() {
            *guard = mode;
        }
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
            .read()
            .map(|guard| *guard)
            .unwrap_or_default()
    }

    /// Parses `source` as a module or script, picking the syntax from the extension of `path`.
    pub fn parse(&self, source: &str, path: Option<&Path>) -> Result<ParsedProgram> {
        let mode = self.parse_mode();
        let file_path = Self::file_path(path);
        let display_name = file_path.display().to_string();

        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map.new_source_file(Self::file_name(path).into(), source.to_string());
        let comments = SingleThreadedComments::default();
        let typescript = is_typescript_path(path);

        let lexer = Lexer::new(
            syntax_for_path(path),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            Some(&comments),
        );
        let mut parser = Parser::new_from(lexer);

        let parsed = parser.parse_program();
        let recovered = parser.take_errors();

        let program = match parsed {
            Ok(program) => program,
            Err(err) => return Err(syntax_error(&display_name, &fm, err)),
        };

        match mode {
            ParseMode::Strict => {
                if let Some(first) = recovered.into_iter().next() {
                    return Err(syntax_error(&display_name, &fm, first));
                }
            }
            ParseMode::Loose => {
                for err in &recovered {
                    warn!(
                        file = %display_name,
                        "recovered from parse error: {}",
                        err.kind().msg()
                    );
                }
            }
        }

        Ok(ParsedProgram {
            program,
            source_map,
            comments,
            path: file_path,
            typescript,
        })
    }
}

impl Default for JsFrontend {
    fn default() -> Self {
        Self::new(ParseMode::default())
    }
}

pub fn is_typescript_path(path: Option<&Path>) -> bool {
    path.and_then(|p| p.extension().and_then(|ext| ext.to_str()))
        .map(|ext| {
            TYPESCRIPT_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

/// `.ts`/`.mts`/`.cts` parse as TypeScript, `.tsx` as TypeScript with JSX,
/// everything else as ECMAScript with JSX enabled.
pub fn syntax_for_path(path: Option<&Path>) -> Syntax {
    let extension = path
        .and_then(|p| p.extension().and_then(|ext| ext.to_str()))
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        Some(ext) if TYPESCRIPT_EXTENSIONS.contains(&ext) => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
    }
}

fn syntax_error(file: &str, fm: &SourceFile, err: SwcError) -> Error {
    let range = source_range(fm, err.span());
    Error::syntax(file, err.kind().msg().to_string(), Some(range))
}

fn source_range(fm: &SourceFile, span: Span) -> SourceRange {
    let start = span.lo.0.saturating_sub(fm.start_pos.0) as usize;
    let end = span.hi.0.saturating_sub(fm.start_pos.0) as usize;
    SourceRange {
        start,
        len: end.saturating_sub(start),
    }
}
