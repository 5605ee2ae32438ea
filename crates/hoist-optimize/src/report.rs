use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::Serialize;

/// Why a namespace call site was left in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "kebab-case")]
pub enum Rejection {
    /// No function scope encloses the site; it already runs once.
    TopLevel,
    /// The namespace identifier resolves to a parameter or local binding.
    ShadowedNamespace,
    /// The expression reads `this`.
    ReceiverReference,
    /// The expression reads `arguments`, `super` or `new.target` of an enclosing function.
    CallSiteReference(String),
    /// The expression reads a binding of an enclosing function scope.
    LocalBinding(String),
    /// The expression reads a top-level binding that is not an import.
    TopLevelBinding(String),
    /// The identifier carries no scope information the analysis understands.
    UnresolvedContext(String),
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TopLevel => write!(f, "already at top level"),
            Rejection::ShadowedNamespace => write!(f, "namespace is shadowed by a local binding"),
            Rejection::ReceiverReference => write!(f, "reads `this`"),
            Rejection::CallSiteReference(name) => write!(f, "reads `{name}` of the enclosing call"),
            Rejection::LocalBinding(name) => write!(f, "reads local binding `{name}`"),
            Rejection::TopLevelBinding(name) => {
                write!(f, "reads top-level binding `{name}` before it is initialized")
            }
            Rejection::UnresolvedContext(name) => write!(f, "cannot resolve `{name}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedSite {
    /// Discovery index of the site within the pass.
    pub site: usize,
    /// Byte offset of the site in the parsed source map.
    pub offset: u32,
    pub reason: Rejection,
}

/// Outcome of one hoisting pass over one program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HoistReport {
    /// Outermost namespace calls that are not nested in another namespace call.
    pub sites: usize,
    /// Sites replaced by a reference to a hoisted declaration.
    pub hoisted_sites: usize,
    /// Names of the inserted declarations, in insertion order.
    pub declarations: Vec<String>,
    pub rejections: Vec<RejectedSite>,
}

impl HoistReport {
    pub fn changed(&self) -> bool {
        self.hoisted_sites > 0
    }

    /// Sites that shared a declaration with an earlier identical site.
    pub fn reused_sites(&self) -> usize {
        self.hoisted_sites.saturating_sub(self.declarations.len())
    }

    /// One-line human summary, e.g. `3 sites, 2 hoisted into _schema, _schema2`.
    pub fn summary(&self) -> String {
        if self.declarations.is_empty() {
            return format!("{} sites, nothing hoisted", self.sites);
        }
        format!(
            "{} sites, {} hoisted into {}",
            self.sites,
            self.hoisted_sites,
            self.declarations.iter().join(", ")
        )
    }
}
