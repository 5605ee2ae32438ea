//! Read-only phase: finds every site, decides its fate and assigns names.

use hoist_core::{debug, trace};
use hoist_core::error::Result;
use hoist_javascript::ExprSerializer;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::queries::{
    can_hoist, is_namespace_call, namespace_root, Ancestry, Link, ProgramScope, Verdict,
};
use crate::report::{HoistReport, RejectedSite, Rejection};
use crate::utils::DedupRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteDecision {
    Keep,
    Hoist { name: String, fresh: bool },
}

/// Decisions indexed by site ordinal (pre-order, left to right).
#[derive(Debug, Clone, Default)]
pub struct HoistPlan {
    pub decisions: Vec<SiteDecision>,
    pub report: HoistReport,
}

pub struct SiteCollector<'a> {
    namespace: &'a str,
    scope: &'a ProgramScope,
    serializer: &'a dyn ExprSerializer,
    registry: DedupRegistry,
    ancestry: Ancestry,
    function_depth: usize,
    plan: HoistPlan,
    failure: Option<hoist_core::Error>,
}

impl<'a> SiteCollector<'a> {
    pub fn new(
        namespace: &'a str,
        scope: &'a ProgramScope,
        serializer: &'a dyn ExprSerializer,
        registry: DedupRegistry,
    ) -> Self {
        Self {
            namespace,
            scope,
            serializer,
            registry,
            ancestry: Ancestry::default(),
            function_depth: 0,
            plan: HoistPlan::default(),
            failure: None,
        }
    }

    pub fn into_plan(self) -> Result<HoistPlan> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.plan),
        }
    }

    fn is_site(&self, rooted: bool) -> bool {
        rooted
            && self.ancestry.outermost_call_distance() == 0
            && !self.ancestry.is_nested_in_target_call()
    }

    fn decide(&mut self, call: &CallExpr) {
        let site = self.plan.decisions.len();
        self.plan.report.sites += 1;
        trace!(site, offset = call.span.lo.0, "schema site");

        let decision = match self.evaluate(call) {
            Ok(decision) => decision,
            Err(rejection) => {
                debug!(site, %rejection, "keeping schema in place");
                self.plan.report.rejections.push(RejectedSite {
                    site,
                    offset: call.span.lo.0,
                    reason: rejection,
                });
                SiteDecision::Keep
            }
        };
        self.plan.decisions.push(decision);
    }

    fn evaluate(&mut self, call: &CallExpr) -> std::result::Result<SiteDecision, Rejection> {
        if self.function_depth == 0 {
            return Err(Rejection::TopLevel);
        }
        let Some(root) = namespace_root(call, self.namespace) else {
            return Err(Rejection::UnresolvedContext(self.namespace.to_string()));
        };
        if !self.scope.is_global_namespace_reference(root) {
            return Err(Rejection::ShadowedNamespace);
        }
        if let Verdict::Unsafe(rejection) = can_hoist(call, root, self.scope) {
            return Err(rejection);
        }

        // Printer failures abort the pass; record and keep the site untouched.
        let canonical = match self.serializer.canonical_form(call) {
            Ok(canonical) => canonical,
            Err(err) => {
                self.failure.get_or_insert(err);
                return Ok(SiteDecision::Keep);
            }
        };

        let registration = self.registry.register(canonical);
        let name = registration.name().to_string();
        let fresh = registration.is_fresh();
        self.plan.report.hoisted_sites += 1;
        if fresh {
            debug!(name = %name, "hoisting schema");
            self.plan.report.declarations.push(name.clone());
        } else {
            debug!(name = %name, "reusing hoisted schema");
        }
        Ok(SiteDecision::Hoist { name, fresh })
    }

    fn enter_function<N: VisitWith<Self>>(&mut self, node: &N) {
        self.function_depth += 1;
        node.visit_children_with(self);
        self.function_depth -= 1;
    }
}

impl Visit for SiteCollector<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Call(_) | Expr::Member(_) | Expr::Paren(_) => node.visit_children_with(self),
            _ => {
                self.ancestry.push(Link::Opaque);
                node.visit_children_with(self);
                self.ancestry.pop();
            }
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.failure.is_some() {
            return;
        }
        let rooted = is_namespace_call(node, self.namespace);
        if self.is_site(rooted) {
            self.decide(node);
        }

        self.ancestry.push(Link::Callee { rooted });
        node.callee.visit_with(self);
        self.ancestry.replace_top(Link::Argument { rooted });
        node.args.visit_with(self);
        node.type_args.visit_with(self);
        self.ancestry.pop();
    }

    fn visit_member_expr(&mut self, node: &MemberExpr) {
        self.ancestry.push(Link::Object);
        node.obj.visit_with(self);
        self.ancestry.replace_top(Link::Property);
        node.prop.visit_with(self);
        self.ancestry.pop();
    }

    fn visit_function(&mut self, node: &Function) {
        self.enter_function(node);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.enter_function(node);
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        self.enter_function(node);
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        self.enter_function(node);
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.enter_function(node);
    }
}
