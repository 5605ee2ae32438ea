// ProgramPass trait - interface for passes that rewrite a whole program in place

use hoist_core::error::Result;
use swc_core::ecma::ast::Program;

pub trait ProgramPass {
    type Report;

    fn name(&self) -> &str;

    /// Rewrites `program`. On error the program is left as it was.
    fn run(&self, program: &mut Program) -> Result<Self::Report>;
}
