//! Hoists namespace-rooted schema chains out of functions into top-level `const`s.
//!
//! The pass runs in two phases:
//! 1. [`SiteCollector`] walks a resolved copy of the program and records one
//!    [`SiteDecision`] per site, in discovery order.
//! 2. [`SiteRewriter`] replays the same walk over a copy of the original program,
//!    replacing hoisted sites and collecting the declaration initializers; the
//!    declarations are then inserted and the copy replaces the input.
//!
//! The input program is only touched once every step has succeeded.

mod collect;
mod rewrite;

pub use collect::{HoistPlan, SiteCollector, SiteDecision};
pub use rewrite::{insert_declarations, HoistedEntry, SiteCounter, SiteRewriter};

use std::sync::Arc;

use hoist_core::error::Result;
use hoist_core::tracing::info_span;
use hoist_core::{debug, info, HoistOptions};
use hoist_javascript::{CanonicalPrinter, ExprSerializer};
use swc_core::common::{Globals, Mark, GLOBALS};
use swc_core::ecma::ast::Program;
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::visit::{VisitMutWith, VisitWith};

use crate::hoist_ensure;
use crate::queries::ProgramScope;
use crate::report::HoistReport;
use crate::utils::{collect_names, DedupRegistry, NameGenerator, ProgramPass};

pub struct HoistSchemasPass {
    serializer: Arc<dyn ExprSerializer>,
    options: HoistOptions,
    typescript: bool,
}

impl HoistSchemasPass {
    pub fn new(serializer: Arc<dyn ExprSerializer>, options: HoistOptions) -> Self {
        Self {
            serializer,
            options,
            typescript: false,
        }
    }

    /// Resolve scopes with TypeScript rules (type-only bindings, enums, namespaces).
    pub fn with_typescript(mut self, typescript: bool) -> Self {
        self.typescript = typescript;
        self
    }

    pub fn options(&self) -> &HoistOptions {
        &self.options
    }

    /// Phase one. Works on a resolved clone; `program` is not modified.
    pub fn plan(&self, program: &Program) -> Result<HoistPlan> {
        GLOBALS.set(&Globals::new(), || {
            let unresolved_mark = Mark::new();
            let top_level_mark = Mark::new();

            let mut resolved = program.clone();
            resolved.visit_mut_with(&mut resolver(
                unresolved_mark,
                top_level_mark,
                self.typescript,
            ));

            let scope = ProgramScope::analyze(&resolved, unresolved_mark, top_level_mark);
            debug!(imports = scope.import_count(), "resolved program scope");

            let generator = NameGenerator::new(&self.options.name_prefix, collect_names(&resolved));
            let mut collector = SiteCollector::new(
                &self.options.namespace,
                &scope,
                self.serializer.as_ref(),
                DedupRegistry::new(generator),
            );
            resolved.visit_with(&mut collector);
            collector.into_plan()
        })
    }

    /// Phase two. Returns the rewritten program, leaving `program` as it was.
    fn apply(&self, program: &Program, plan: &HoistPlan) -> Result<Program> {
        let namespace = self.options.namespace.as_str();

        let mut counter = SiteCounter::new(namespace);
        program.visit_with(&mut counter);
        hoist_ensure!(
            counter.sites == plan.decisions.len(),
            "site walk mismatch: planned {} sites, found {}",
            plan.decisions.len(),
            counter.sites
        );

        let mut rewritten = program.clone();
        let mut rewriter = SiteRewriter::new(namespace, &plan.decisions);
        rewritten.visit_mut_with(&mut rewriter);
        hoist_ensure!(
            rewriter.visited_sites() == plan.decisions.len(),
            "rewrite visited {} of {} sites",
            rewriter.visited_sites(),
            plan.decisions.len()
        );

        let entries = rewriter.into_entries();
        hoist_ensure!(
            entries.len() == plan.report.declarations.len(),
            "collected {} initializers for {} declarations",
            entries.len(),
            plan.report.declarations.len()
        );
        insert_declarations(&mut rewritten, entries, self.options.insertion);
        Ok(rewritten)
    }
}

impl Default for HoistSchemasPass {
    fn default() -> Self {
        Self::new(Arc::new(CanonicalPrinter), HoistOptions::default())
    }
}

impl ProgramPass for HoistSchemasPass {
    type Report = HoistReport;

    fn name(&self) -> &str {
        "hoist-schemas"
    }

    fn run(&self, program: &mut Program) -> Result<HoistReport> {
        let span = info_span!("hoist_schemas", namespace = %self.options.namespace);
        let _enter = span.enter();

        self.options.validate()?;
        let plan = self.plan(program)?;
        if plan.report.changed() {
            *program = self.apply(program, &plan)?;
        }

        let report = plan.report;
        info!(
            sites = report.sites,
            hoisted = report.hoisted_sites,
            declarations = report.declarations.len(),
            rejected = report.rejections.len(),
            "schema hoisting finished"
        );
        Ok(report)
    }
}
