//! Decides whether a candidate expression keeps its meaning when evaluated once at
//! the top of the program instead of at its original site.
//!
//! The analysis runs on a resolved program and never mutates it.

use std::collections::HashSet;

use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::queries::{BindingSite, ProgramScope};
use crate::report::Rejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe(Rejection),
}

/// Runs the safety analysis over `call`, whose chain is rooted at `root`.
///
/// `root` must be a node inside `call`; it is recognized by address, not by name.
/// The root is exempt from the reference checks unless it is a top-level non-import
/// binding, which the inserted declaration would read before initialization.
pub fn can_hoist(call: &CallExpr, root: &Ident, scope: &ProgramScope) -> Verdict {
    // A top-level non-import root is read before its initializer once hoisted.
    if scope.binding_site(root) == BindingSite::TopLevel {
        return Verdict::Unsafe(Rejection::TopLevelBinding(root.sym.to_string()));
    }

    let mut declarations = LocalDeclarations::default();
    call.visit_with(&mut declarations);

    let mut analyzer = SafetyAnalyzer::new(root, scope, declarations.ids);
    call.visit_with(&mut analyzer);
    match analyzer.rejection {
        Some(rejection) => Verdict::Unsafe(rejection),
        None => Verdict::Safe,
    }
}

/// Every binding introduced inside a subtree.
#[derive(Debug, Default)]
pub struct LocalDeclarations {
    pub ids: HashSet<Id>,
}

impl Visit for LocalDeclarations {
    fn visit_binding_ident(&mut self, node: &BindingIdent) {
        self.ids.insert(node.id.to_id());
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.ids.insert(node.ident.to_id());
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.ids.insert(node.ident.to_id());
        node.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        if let Some(ident) = &node.ident {
            self.ids.insert(ident.to_id());
        }
        node.visit_children_with(self);
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        if let Some(ident) = &node.ident {
            self.ids.insert(ident.to_id());
        }
        node.visit_children_with(self);
    }
}

/// Classifies every identifier reference inside a candidate and stops at the first
/// one that cannot move to the top of the program.
struct SafetyAnalyzer<'a> {
    root: &'a Ident,
    scope: &'a ProgramScope,
    declared: HashSet<Id>,
    /// Non-arrow functions (and class member bodies) entered inside the candidate.
    /// `arguments`, `super` and `new.target` are bound locally when this is non-zero.
    own_functions: usize,
    /// Functions of any kind, arrows included, entered inside the candidate.
    /// `yield` and `await` suspend the enclosing call unless this is non-zero.
    function_bodies: usize,
    rejection: Option<Rejection>,
}

impl<'a> SafetyAnalyzer<'a> {
    fn new(root: &'a Ident, scope: &'a ProgramScope, declared: HashSet<Id>) -> Self {
        Self {
            root,
            scope,
            declared,
            own_functions: 0,
            function_bodies: 0,
            rejection: None,
        }
    }

    fn reject(&mut self, rejection: Rejection) {
        if self.rejection.is_none() {
            self.rejection = Some(rejection);
        }
    }

    fn rejected(&self) -> bool {
        self.rejection.is_some()
    }

    fn in_own_function(&self) -> bool {
        self.own_functions > 0
    }

    fn suspends_caller(&mut self, keyword: &str) -> bool {
        if self.function_bodies == 0 {
            self.reject(Rejection::CallSiteReference(keyword.to_string()));
            return true;
        }
        false
    }

    fn enter_own_function<N: VisitWith<Self>>(&mut self, node: &N) {
        self.own_functions += 1;
        node.visit_children_with(self);
        self.own_functions -= 1;
    }

    fn classify(&mut self, ident: &Ident) {
        if std::ptr::eq(ident, self.root) || self.declared.contains(&ident.to_id()) {
            return;
        }

        let site = self.scope.binding_site(ident);
        if &*ident.sym == "arguments" && !matches!(site, BindingSite::Import | BindingSite::TopLevel)
        {
            if !self.in_own_function() {
                self.reject(Rejection::CallSiteReference("arguments".to_string()));
            }
            return;
        }

        match site {
            BindingSite::Free | BindingSite::Import => {}
            BindingSite::TopLevel => {
                self.reject(Rejection::TopLevelBinding(ident.sym.to_string()));
            }
            BindingSite::Nested => {
                self.reject(Rejection::LocalBinding(ident.sym.to_string()));
            }
            BindingSite::Unknown => {
                self.reject(Rejection::UnresolvedContext(ident.sym.to_string()));
            }
        }
    }
}

impl Visit for SafetyAnalyzer<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        if self.rejected() {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_stmt(&mut self, node: &Stmt) {
        if self.rejected() {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_ident(&mut self, node: &Ident) {
        if self.rejected() {
            return;
        }
        self.classify(node);
    }

    fn visit_this_expr(&mut self, _: &ThisExpr) {
        self.reject(Rejection::ReceiverReference);
    }

    fn visit_super(&mut self, _: &Super) {
        if !self.in_own_function() {
            self.reject(Rejection::CallSiteReference("super".to_string()));
        }
    }

    fn visit_meta_prop_expr(&mut self, node: &MetaPropExpr) {
        if matches!(node.kind, MetaPropKind::NewTarget) && !self.in_own_function() {
            self.reject(Rejection::CallSiteReference("new.target".to_string()));
        }
    }

    fn visit_yield_expr(&mut self, node: &YieldExpr) {
        if !self.suspends_caller("yield") {
            node.visit_children_with(self);
        }
    }

    fn visit_await_expr(&mut self, node: &AwaitExpr) {
        if !self.suspends_caller("await") {
            node.visit_children_with(self);
        }
    }

    fn visit_member_prop(&mut self, node: &MemberProp) {
        if let MemberProp::Computed(computed) = node {
            computed.visit_with(self);
        }
    }

    fn visit_super_prop(&mut self, node: &SuperProp) {
        if let SuperProp::Computed(computed) = node {
            computed.visit_with(self);
        }
    }

    fn visit_prop_name(&mut self, node: &PropName) {
        if let PropName::Computed(computed) = node {
            computed.visit_with(self);
        }
    }

    fn visit_labeled_stmt(&mut self, node: &LabeledStmt) {
        node.body.visit_with(self);
    }

    fn visit_break_stmt(&mut self, _: &BreakStmt) {}

    fn visit_continue_stmt(&mut self, _: &ContinueStmt) {}

    // types are erased before evaluation
    fn visit_ts_type(&mut self, _: &TsType) {}

    fn visit_ts_type_param_decl(&mut self, _: &TsTypeParamDecl) {}

    fn visit_function(&mut self, node: &Function) {
        self.function_bodies += 1;
        self.enter_own_function(node);
        self.function_bodies -= 1;
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.function_bodies += 1;
        node.visit_children_with(self);
        self.function_bodies -= 1;
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        self.enter_own_function(node);
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        self.enter_own_function(node);
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.enter_own_function(node);
    }

    fn visit_class_prop(&mut self, node: &ClassProp) {
        self.enter_own_function(node);
    }

    fn visit_private_prop(&mut self, node: &PrivateProp) {
        self.enter_own_function(node);
    }

    fn visit_static_block(&mut self, node: &StaticBlock) {
        self.enter_own_function(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::namespace_root;
    use hoist_javascript::JsFrontend;
    use pretty_assertions::assert_eq;
    use swc_core::common::{Globals, Mark, GLOBALS};
    use swc_core::ecma::transforms::base::resolver;
    use swc_core::ecma::visit::VisitMutWith;

    /// Verdicts for every outermost `z` call in `source`, in source order.
    fn verdicts(source: &str) -> Vec<Verdict> {
        let parsed = JsFrontend::default().parse(source, None).unwrap();
        GLOBALS.set(&Globals::new(), || {
            let unresolved_mark = Mark::new();
            let top_level_mark = Mark::new();
            let mut program = parsed.program;
            program.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));
            let scope = ProgramScope::analyze(&program, unresolved_mark, top_level_mark);

            let mut finder = OutermostCalls::default();
            program.visit_with(&mut finder);
            finder
                .calls
                .iter()
                .map(|call| {
                    let root = namespace_root(call, "z").unwrap();
                    can_hoist(call, root, &scope)
                })
                .collect()
        })
    }

    #[derive(Default)]
    struct OutermostCalls {
        calls: Vec<CallExpr>,
    }

    impl Visit for OutermostCalls {
        fn visit_return_stmt(&mut self, node: &ReturnStmt) {
            if let Some(Expr::Call(call)) = node.arg.as_deref() {
                self.calls.push(call.clone());
            }
            node.visit_children_with(self);
        }
    }

    #[test]
    fn constant_arguments_are_safe() {
        let result = verdicts("function f() { return z.object({ name: z.string().min(1) }); }");
        assert_eq!(result, vec![Verdict::Safe]);
    }

    #[test]
    fn parameters_are_local_bindings() {
        let result = verdicts("function f(minLength) { return z.string().min(minLength); }");
        assert_eq!(
            result,
            vec![Verdict::Unsafe(Rejection::LocalBinding("minLength".into()))]
        );
    }

    #[test]
    fn callback_parameters_travel_with_the_candidate() {
        let result = verdicts(
            "function f() { return z.string().refine((value) => value.length > 0 && isNaN(value)); }",
        );
        assert_eq!(result, vec![Verdict::Safe]);
    }

    #[test]
    fn later_top_level_declarations_are_rejected() {
        let result = verdicts(
            "function f() { return z.enum(allowedTypes); }\nconst allowedTypes = ['a', 'b'];",
        );
        assert_eq!(
            result,
            vec![Verdict::Unsafe(Rejection::TopLevelBinding(
                "allowedTypes".into()
            ))]
        );
    }

    #[test]
    fn imports_are_available_everywhere() {
        let result = verdicts(
            "import { z } from 'zod';\nimport { check } from './check';\nfunction f() { return z.string().refine(check); }",
        );
        assert_eq!(result, vec![Verdict::Safe]);
    }

    #[test]
    fn receiver_references_are_rejected() {
        let result =
            verdicts("class A { get schema() { return z.string().refine(() => this.isValid); } }");
        assert_eq!(result, vec![Verdict::Unsafe(Rejection::ReceiverReference)]);
    }

    #[test]
    fn arguments_depends_on_the_enclosing_function() {
        let result = verdicts(
            "function f() { return z.string().refine(() => arguments.length > 0); }\nfunction g() { return z.string().refine(function () { return arguments.length > 0; }); }",
        );
        assert_eq!(
            result,
            vec![
                Verdict::Unsafe(Rejection::CallSiteReference("arguments".into())),
                Verdict::Safe,
            ]
        );
    }

    #[test]
    fn property_names_and_labels_are_not_references() {
        let result = verdicts(
            "function f(key) { return z.object({ key: z.string() }).refine(function (v) { outer: for (;;) { break outer; } return v.key; }); }",
        );
        assert_eq!(result, vec![Verdict::Safe]);
    }

    #[test]
    fn computed_keys_are_references() {
        let result = verdicts("function f(key) { return z.object({ [key]: z.string() }); }");
        assert_eq!(
            result,
            vec![Verdict::Unsafe(Rejection::LocalBinding("key".into()))]
        );
    }

    #[test]
    fn yield_of_the_enclosing_generator_is_rejected() {
        let result = verdicts(
            "function* g() { return z.string().default(yield 1); }\nfunction h() { return z.string().refine(function* () { yield 1; }); }",
        );
        assert_eq!(
            result,
            vec![
                Verdict::Unsafe(Rejection::CallSiteReference("yield".into())),
                Verdict::Safe,
            ]
        );
    }

    #[test]
    fn await_depends_on_the_enclosing_function() {
        let result = verdicts(
            "import { load } from './load';\nasync function f() { return z.string().default(await load()); }\nfunction g() { return z.string().refine(async (value) => await load(value)); }",
        );
        assert_eq!(
            result,
            vec![
                Verdict::Unsafe(Rejection::CallSiteReference("await".into())),
                Verdict::Safe,
            ]
        );
    }

    #[test]
    fn top_level_namespace_binding_is_rejected() {
        let result = verdicts("const z = require('zod');\nfunction f() { return z.string(); }");
        assert_eq!(
            result,
            vec![Verdict::Unsafe(Rejection::TopLevelBinding("z".into()))]
        );
    }
}
