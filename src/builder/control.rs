use crate::ast::{NodeId, Slot};
use crate::error::BuildError;
use crate::syntax::SyntaxKind;

fn construct_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::ForLoop => "for-loop",
        SyntaxKind::WhileLoop => "while-loop",
        SyntaxKind::If => "if-statement",
        _ => "else-statement",
    }
}

impl<'a> super::Builder<'a> {
    /// Attach a condition and body to a `for`, `while`, `if` or `else` keyword
    ///
    /// `for (a; b; c) body;` becomes a ForLoop node whose children are
    /// everything from the keyword up to and including the `;` (or brace
    /// group) that ends the body. The rest of the sequence is spliced back
    /// after the control node.
    pub(super) fn build_ctrl(&mut self, ctrl: NodeId, depth: usize) -> Result<(), BuildError> {
        let line = self.ast.line(ctrl);
        let Some(kind) = self.ast.kind(ctrl).control_group() else {
            return Ok(());
        };
        self.ast.set_kind(ctrl, kind);
        let construct = construct_name(kind);

        let cond = if kind == SyntaxKind::Else {
            None
        } else {
            match self.next_parens(ctrl) {
                Some(parens) => Some(parens),
                None => return Err(BuildError::MissingCondition { construct, line }),
            }
        };

        let end = self
            .next_semicolon_or_braces(cond.unwrap_or(ctrl))
            .ok_or(BuildError::MissingBody { construct, line })?;

        // Relink: keyword adopts [next .. end], keeps what follows end
        let body_start = self.ast.next(ctrl);
        let rest = self.ast.next(end);
        self.ast.set(Slot::Child(ctrl), body_start);
        self.ast.set(Slot::Next(ctrl), rest);
        self.ast.set(Slot::Next(end), None);

        match cond {
            None => self.build_stmts(Slot::Child(ctrl), depth + 1),
            Some(parens) => {
                // Header clauses, then the body after the parens
                self.build_stmts(Slot::Child(parens), depth + 1)?;
                self.build_stmts(Slot::Next(parens), depth + 1)
            }
        }
    }
}
