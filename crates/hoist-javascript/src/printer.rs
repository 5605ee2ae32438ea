use hoist_core::error::{Error, Result};
use swc_core::common::comments::{Comments, SingleThreadedComments};
use swc_core::common::{sync::Lrc, SourceMap, DUMMY_SP};
use swc_core::ecma::ast::{CallExpr, Expr, ExprStmt, Module, Program, Script, Stmt};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter};

use crate::frontend::ParsedProgram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    pub minify: bool,
    pub keep_comments: bool,
}

impl PrinterConfig {
    pub fn pretty() -> Self {
        Self {
            minify: false,
            keep_comments: true,
        }
    }

    pub fn compact() -> Self {
        Self {
            minify: true,
            keep_comments: false,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::pretty()
    }
}

/// Renders the text a call expression is deduplicated by.
pub trait ExprSerializer: Send + Sync {
    fn canonical_form(&self, call: &CallExpr) -> Result<String>;
}

pub struct JsPrinter {
    source_map: Lrc<SourceMap>,
    comments: Option<SingleThreadedComments>,
    config: PrinterConfig,
}

impl JsPrinter {
    pub fn with_config(config: PrinterConfig) -> Self {
        Self {
            source_map: Lrc::new(SourceMap::default()),
            comments: None,
            config,
        }
    }

    /// Printer sharing the source map (and, if configured, the comments) of a parsed file.
    pub fn for_parsed(parsed: &ParsedProgram, config: PrinterConfig) -> Self {
        Self {
            source_map: parsed.source_map.clone(),
            comments: config.keep_comments.then(|| parsed.comments.clone()),
            config,
        }
    }

    pub fn print_program(&self, program: &Program) -> Result<String> {
        match program {
            Program::Module(module) => self.print_module(module),
            Program::Script(script) => self.print_script(script),
        }
    }

    pub fn print_module(&self, module: &Module) -> Result<String> {
        let mut buf = Vec::new();
        {
            let mut emitter = self.emitter(&mut buf);
            emitter.emit_module(module)?;
        }
        into_string(buf)
    }

    pub fn print_script(&self, script: &Script) -> Result<String> {
        let mut buf = Vec::new();
        {
            let mut emitter = self.emitter(&mut buf);
            emitter.emit_script(script)?;
        }
        into_string(buf)
    }

    /// Prints a single expression without the trailing statement terminator.
    pub fn print_expr(&self, expr: &Expr) -> Result<String> {
        let script = Script {
            span: DUMMY_SP,
            body: vec![Stmt::Expr(ExprStmt {
                span: DUMMY_SP,
                expr: Box::new(expr.clone()),
            })],
            shebang: None,
        };
        let code = self.print_script(&script)?;
        Ok(code.trim_end().trim_end_matches(';').to_string())
    }

    fn emitter<'a>(
        &'a self,
        buf: &'a mut Vec<u8>,
    ) -> Emitter<'a, JsWriter<'a, &'a mut Vec<u8>>, SourceMap> {
        let mut cfg = Config::default();
        cfg.minify = self.config.minify;

        Emitter {
            cfg,
            cm: self.source_map.clone(),
            comments: self
                .comments
                .as_ref()
                .map(|comments| comments as &dyn Comments),
            wr: JsWriter::new(self.source_map.clone(), "\n", buf, None),
        }
    }
}

fn into_string(buf: Vec<u8>) -> Result<String> {
    String::from_utf8(buf).map_err(|err| Error::Print(err.to_string()))
}

/// Minified, comment-free rendering used as the deduplication key.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalPrinter;

impl ExprSerializer for CanonicalPrinter {
    fn canonical_form(&self, call: &CallExpr) -> Result<String> {
        JsPrinter::with_config(PrinterConfig::compact()).print_expr(&Expr::Call(call.clone()))
    }
}
