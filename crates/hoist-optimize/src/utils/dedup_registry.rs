// Dedup registry - maps canonical forms to generated top-level names

use std::collections::{HashMap, HashSet};

use swc_core::ecma::ast::{Ident, Program};
use swc_core::ecma::visit::{Visit, VisitWith};

/// Every identifier name that appears anywhere in `program`.
///
/// Property names are included only when they are written as identifiers in
/// reference position; generated names avoid all of them.
pub fn collect_names(program: &Program) -> HashSet<String> {
    let mut collector = NameCollector::default();
    program.visit_with(&mut collector);
    collector.names
}

#[derive(Default)]
struct NameCollector {
    names: HashSet<String>,
}

impl Visit for NameCollector {
    fn visit_ident(&mut self, node: &Ident) {
        self.names.insert(node.sym.to_string());
    }
}

/// Generates `_schema`, `_schema2`, `_schema3`, ... skipping every taken name.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    base: String,
    taken: HashSet<String>,
    next_index: usize,
}

impl NameGenerator {
    pub fn new(prefix: &str, taken: HashSet<String>) -> Self {
        let base = prefix
            .trim_start_matches('_')
            .trim_end_matches(|c: char| c.is_ascii_digit());
        let base = if base.is_empty() { "ref" } else { base };
        Self {
            base: base.to_string(),
            taken,
            next_index: 1,
        }
    }

    pub fn generate(&mut self) -> String {
        loop {
            let candidate = if self.next_index > 1 {
                format!("_{}{}", self.base, self.next_index)
            } else {
                format!("_{}", self.base)
            };
            self.next_index += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First occurrence of the canonical form; the caller queues a declaration.
    Fresh(String),
    /// The canonical form was registered earlier; only the reference is emitted.
    Reused(String),
}

impl Registration {
    pub fn name(&self) -> &str {
        match self {
            Registration::Fresh(name) | Registration::Reused(name) => name,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Registration::Fresh(_))
    }
}

/// Per-pass state: one instance per program, dropped when the pass ends.
#[derive(Debug, Clone)]
pub struct DedupRegistry {
    names: HashMap<String, String>,
    generator: NameGenerator,
}

impl DedupRegistry {
    pub fn new(generator: NameGenerator) -> Self {
        Self {
            names: HashMap::new(),
            generator,
        }
    }

    pub fn register(&mut self, canonical: String) -> Registration {
        if let Some(name) = self.names.get(&canonical) {
            return Registration::Reused(name.clone());
        }
        let name = self.generator.generate();
        self.names.insert(canonical, name.clone());
        Registration::Fresh(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
