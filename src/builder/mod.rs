// Builder module - nests the lexer's flat sequence into statements and
// control structures
mod control;
mod helpers;
mod prebrace;
mod statements;

use crate::ast::{Ast, Slot};
use crate::error::BuildError;
use crate::limits::TransformLimits;

// Builder structure
pub struct Builder<'a> {
    ast: Ast,
    limits: &'a TransformLimits,
}

impl<'a> Builder<'a> {
    pub fn new(ast: Ast, limits: &'a TransformLimits) -> Self {
        Self { ast, limits }
    }

    // Main building entry point
    pub fn build(mut self) -> Result<Ast, BuildError> {
        self.build_stmts(Slot::Root, 0)?;
        Ok(self.ast)
    }
}

// Public API function
pub fn build(ast: Ast, limits: &TransformLimits) -> Result<Ast, BuildError> {
    let ast = Builder::new(ast, limits).build()?;
    tracing::debug!(nodes = ast.live_count(), "built statements");
    Ok(ast)
}
