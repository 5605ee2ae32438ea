//! Mutating phase: swaps hoisted sites for references and inserts the declarations.

use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

use hoist_core::InsertionPoint;

use super::collect::SiteDecision;
use crate::queries::is_namespace_call;

/// A hoisted declaration waiting to be inserted: `const <name> = <init>;`.
#[derive(Debug, Clone)]
pub struct HoistedEntry {
    pub name: String,
    pub init: Box<Expr>,
}

/// Counts sites the way [`SiteRewriter`] walks them: the first namespace-rooted call on
/// every path from the root, without looking inside it.
pub struct SiteCounter<'a> {
    namespace: &'a str,
    pub sites: usize,
}

impl<'a> SiteCounter<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            sites: 0,
        }
    }
}

impl Visit for SiteCounter<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if is_namespace_call(node, self.namespace) {
            self.sites += 1;
            return;
        }
        node.visit_children_with(self);
    }
}

pub struct SiteRewriter<'a> {
    namespace: &'a str,
    decisions: &'a [SiteDecision],
    next_site: usize,
    entries: Vec<HoistedEntry>,
}

impl<'a> SiteRewriter<'a> {
    pub fn new(namespace: &'a str, decisions: &'a [SiteDecision]) -> Self {
        Self {
            namespace,
            decisions,
            next_site: 0,
            entries: Vec::new(),
        }
    }

    pub fn visited_sites(&self) -> usize {
        self.next_site
    }

    pub fn into_entries(self) -> Vec<HoistedEntry> {
        self.entries
    }
}

impl VisitMut for SiteRewriter<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        let site_span = match expr {
            Expr::Call(call) if is_namespace_call(call, self.namespace) => Some(call.span),
            _ => None,
        };
        let Some(span) = site_span else {
            expr.visit_mut_children_with(self);
            return;
        };

        let decisions = self.decisions;
        let decision = decisions.get(self.next_site);
        self.next_site += 1;

        if let Some(SiteDecision::Hoist { name, fresh }) = decision {
            let reference = Expr::Ident(Ident::new(
                name.as_str().into(),
                span,
                SyntaxContext::empty(),
            ));
            let original = std::mem::replace(expr, reference);
            if *fresh {
                self.entries.push(HoistedEntry {
                    name: name.clone(),
                    init: Box::new(original),
                });
            }
        }
    }
}

/// Inserts `const` declarations for `entries`, in order, at `insertion`.
pub fn insert_declarations(
    program: &mut Program,
    entries: Vec<HoistedEntry>,
    insertion: InsertionPoint,
) {
    if entries.is_empty() {
        return;
    }

    match program {
        Program::Module(module) => {
            let index = module_insertion_index(&module.body, insertion);
            let items = entries
                .into_iter()
                .map(|entry| ModuleItem::Stmt(declaration(entry)));
            module.body.splice(index..index, items);
        }
        Program::Script(script) => {
            let index = leading_directives(script.body.iter());
            let stmts = entries.into_iter().map(declaration);
            script.body.splice(index..index, stmts);
        }
    }
}

fn module_insertion_index(body: &[ModuleItem], insertion: InsertionPoint) -> usize {
    let directives = leading_directives(body.iter().map_while(|item| match item {
        ModuleItem::Stmt(stmt) => Some(stmt),
        ModuleItem::ModuleDecl(_) => None,
    }));
    match insertion {
        InsertionPoint::ProgramStart => directives,
        InsertionPoint::AfterImports => {
            let imports = body[directives..]
                .iter()
                .take_while(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
                .count();
            directives + imports
        }
    }
}

/// Length of the directive prologue (`"use strict";` and friends).
fn leading_directives<'a>(stmts: impl Iterator<Item = &'a Stmt>) -> usize {
    stmts.take_while(|stmt| is_directive(stmt)).count()
}

fn is_directive(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(ExprStmt { expr, .. }) => matches!(&**expr, Expr::Lit(Lit::Str(_))),
        _ => false,
    }
}

fn declaration(entry: HoistedEntry) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: Ident::new(entry.name.into(), DUMMY_SP, SyntaxContext::empty()),
                type_ann: None,
            }),
            init: Some(entry.init),
            definite: false,
        }],
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_javascript::{JsFrontend, JsPrinter, PrinterConfig};
    use pretty_assertions::assert_eq;

    fn entry(name: &str) -> HoistedEntry {
        HoistedEntry {
            name: name.to_string(),
            init: Box::new(Expr::Lit(Lit::Num(Number {
                span: DUMMY_SP,
                value: 1.0,
                raw: None,
            }))),
        }
    }

    fn print(program: &Program) -> String {
        JsPrinter::with_config(PrinterConfig::compact())
            .print_program(program)
            .unwrap()
    }

    fn parse(source: &str) -> Program {
        JsFrontend::default().parse(source, None).unwrap().program
    }

    fn insert(source: &str, insertion: InsertionPoint) -> String {
        let mut program = parse(source);
        insert_declarations(&mut program, vec![entry("_a"), entry("_b")], insertion);
        print(&program)
    }

    #[test]
    fn module_declarations_follow_imports() {
        let code = insert(
            "'use strict'; import a from 'a'; import b from 'b'; f();",
            InsertionPoint::AfterImports,
        );
        let expected = parse(
            "'use strict'; import a from 'a'; import b from 'b'; const _a = 1; const _b = 1; f();",
        );
        assert_eq!(code, print(&expected));
    }

    #[test]
    fn program_start_keeps_directives_first() {
        let code = insert(
            "'use strict'; import a from 'a'; f();",
            InsertionPoint::ProgramStart,
        );
        let expected = parse("'use strict'; const _a = 1; const _b = 1; import a from 'a'; f();");
        assert_eq!(code, print(&expected));
    }

    #[test]
    fn scripts_insert_after_directives() {
        let code = insert("'use strict'; f();", InsertionPoint::AfterImports);
        let expected = parse("'use strict'; const _a = 1; const _b = 1; f();");
        assert_eq!(code, print(&expected));
    }

    #[test]
    fn empty_entries_leave_the_program_alone() {
        let mut program = parse("f();");
        let before = print(&program);
        insert_declarations(&mut program, Vec::new(), InsertionPoint::ProgramStart);
        assert_eq!(print(&program), before);
    }

    #[test]
    fn counter_does_not_look_inside_sites() {
        let program = JsFrontend::default()
            .parse(
                "z.object({ a: z.string() }).optional(); f(z.number(), g(z.string()));",
                None,
            )
            .unwrap()
            .program;
        let mut counter = SiteCounter::new("z");
        program.visit_with(&mut counter);
        assert_eq!(counter.sites, 3);
    }
}
