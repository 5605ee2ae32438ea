//! Member/call chain queries.
//!
//! A chain is a spine of member accesses and calls such as `z.string().min(1)`.
//! Parentheses are transparent to the spine.

use swc_core::ecma::ast::{CallExpr, Callee, Expr, Ident};

/// Follows `callee` through calls and `obj` through member accesses until neither applies.
pub fn chain_root(expr: &Expr) -> &Expr {
    let mut current = expr;
    loop {
        current = match current {
            Expr::Call(CallExpr {
                callee: Callee::Expr(callee),
                ..
            }) => callee.as_ref(),
            Expr::Member(member) => member.obj.as_ref(),
            Expr::Paren(paren) => paren.expr.as_ref(),
            _ => return current,
        };
    }
}

/// Root of the chain a call belongs to. `super(...)` and `import(...)` have none.
pub fn call_chain_root(call: &CallExpr) -> Option<&Expr> {
    match &call.callee {
        Callee::Expr(callee) => Some(chain_root(callee)),
        _ => None,
    }
}

/// The root identifier of `call` when it is literally named `namespace`.
pub fn namespace_root<'a>(call: &'a CallExpr, namespace: &str) -> Option<&'a Ident> {
    match call_chain_root(call)? {
        Expr::Ident(ident) if &*ident.sym == namespace => Some(ident),
        _ => None,
    }
}

pub fn is_namespace_call(call: &CallExpr, namespace: &str) -> bool {
    namespace_root(call, namespace).is_some()
}

/// How the node being visited hangs off its nearest chain-relevant ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Inside the callee of a call. `rooted` marks calls rooted at the namespace.
    Callee { rooted: bool },
    /// Inside an argument of a call.
    Argument { rooted: bool },
    /// Inside the object of a member access.
    Object,
    /// Inside the computed property of a member access.
    Property,
    /// Inside any other expression.
    Opaque,
}

impl Link {
    fn is_rooted_call(self) -> bool {
        matches!(
            self,
            Link::Callee { rooted: true } | Link::Argument { rooted: true }
        )
    }
}

/// Ancestor links of the node being visited, innermost last.
///
/// Visitors without parent pointers push a link when they descend into a call,
/// a member access or any other expression, which is enough to walk a chain upward.
#[derive(Debug, Default, Clone)]
pub struct Ancestry {
    links: Vec<Link>,
}

impl Ancestry {
    pub fn push(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn pop(&mut self) {
        self.links.pop();
    }

    pub fn replace_top(&mut self, link: Link) {
        if let Some(top) = self.links.last_mut() {
            *top = link;
        }
    }

    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// How many calls above the current call the outermost call of its chain sits.
    ///
    /// Walks upward through "call is the object of a member access whose parent is
    /// itself a call"; `0` means the current call is the outermost one.
    pub fn outermost_call_distance(&self) -> usize {
        let mut distance = 0;
        let mut rest = self.links.as_slice();
        while let [outer @ .., Link::Callee { .. }, Link::Object] = rest {
            distance += 1;
            rest = outer;
        }
        distance
    }

    /// Whether an ancestor of the current chain's outermost call is a namespace-rooted call.
    pub fn is_nested_in_target_call(&self) -> bool {
        let chain_links = self.outermost_call_distance() * 2;
        self.links[..self.links.len() - chain_links]
            .iter()
            .any(|link| link.is_rooted_call())
    }
}
