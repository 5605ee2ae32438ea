//! Binding classification on top of the swc resolver.
//!
//! After `resolver(unresolved_mark, top_level_mark, ..)` every identifier carries a
//! syntax context: program-scope bindings share the top-level context, free
//! references share the unresolved context, and each nested scope gets its own.

use std::collections::HashSet;

use swc_core::common::{Mark, SyntaxContext};
use swc_core::ecma::ast::{Id, Ident, ImportSpecifier, ModuleDecl, ModuleItem, Program};

/// Where the binding an identifier refers to was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSite {
    /// No declaration in the program: a global or an externally provided name.
    Free,
    /// Declared by a top-level import clause.
    Import,
    /// Declared at program scope by anything other than an import.
    TopLevel,
    /// Declared in a function, block or other nested scope.
    Nested,
    /// The resolver left no context on the identifier.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct ProgramScope {
    unresolved: SyntaxContext,
    top_level: SyntaxContext,
    imports: HashSet<Id>,
}

impl ProgramScope {
    /// Must run inside the `GLOBALS` the marks were created in, on a resolved program.
    pub fn analyze(program: &Program, unresolved_mark: Mark, top_level_mark: Mark) -> Self {
        Self {
            unresolved: SyntaxContext::empty().apply_mark(unresolved_mark),
            top_level: SyntaxContext::empty().apply_mark(top_level_mark),
            imports: import_bindings(program),
        }
    }

    pub fn binding_site(&self, ident: &Ident) -> BindingSite {
        if ident.ctxt == self.unresolved {
            BindingSite::Free
        } else if ident.ctxt == self.top_level {
            if self.imports.contains(&ident.to_id()) {
                BindingSite::Import
            } else {
                BindingSite::TopLevel
            }
        } else if ident.ctxt == SyntaxContext::empty() {
            BindingSite::Unknown
        } else {
            BindingSite::Nested
        }
    }

    /// Whether the chain root names the program-level namespace rather than a shadowing local.
    pub fn is_global_namespace_reference(&self, root: &Ident) -> bool {
        match self.binding_site(root) {
            BindingSite::Free | BindingSite::Import | BindingSite::TopLevel => true,
            BindingSite::Nested | BindingSite::Unknown => false,
        }
    }

    pub fn import_count(&self) -> usize {
        self.imports.len()
    }
}

fn import_bindings(program: &Program) -> HashSet<Id> {
    let Program::Module(module) = program else {
        return HashSet::new();
    };

    module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        })
        .flat_map(|import| import.specifiers.iter())
        .map(|specifier| match specifier {
            ImportSpecifier::Named(named) => named.local.to_id(),
            ImportSpecifier::Default(default) => default.local.to_id(),
            ImportSpecifier::Namespace(namespace) => namespace.local.to_id(),
        })
        .collect()
}
