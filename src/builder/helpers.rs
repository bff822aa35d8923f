use crate::ast::{NodeId, Slot};
use crate::error::BuildError;
use crate::syntax::SyntaxKind;

// Builder helper methods
impl<'a> super::Builder<'a> {
    // Helper: Check recursion depth limit
    pub(super) fn check_depth(&self, depth: usize, head: Slot) -> Result<(), BuildError> {
        if depth >= self.limits.max_nesting_depth {
            let line = self.ast.get(head).map_or(0, |id| self.ast.line(id));
            return Err(BuildError::TooDeep {
                line,
                max: self.limits.max_nesting_depth,
            });
        }
        Ok(())
    }

    /// Helper: First parens group after `from`, stopping at a statement boundary
    pub(super) fn next_parens(&self, from: NodeId) -> Option<NodeId> {
        for id in self.ast.siblings(self.ast.next(from)) {
            match self.ast.kind(id) {
                SyntaxKind::Parens => return Some(id),
                SyntaxKind::Semicolon | SyntaxKind::Braces => return None,
                _ => {}
            }
        }
        None
    }

    /// Helper: First `;` or brace group after `from`
    pub(super) fn next_semicolon_or_braces(&self, from: NodeId) -> Option<NodeId> {
        self.ast
            .siblings(self.ast.next(from))
            .find(|id| matches!(self.ast.kind(*id), SyntaxKind::Semicolon | SyntaxKind::Braces))
    }

    /// Helper: Skip trivia starting at `slot`; returns the first other node and
    /// the slot that holds it
    pub(super) fn skip_trivia(&self, mut slot: Slot) -> (Slot, Option<NodeId>) {
        while let Some(id) = self.ast.get(slot) {
            if !self.ast.kind(id).is_trivia() {
                return (slot, Some(id));
            }
            slot = Slot::Next(id);
        }
        (slot, None)
    }

    /// Helper: Walk from `slot` to the first node of `kind`
    pub(super) fn seek(&self, mut slot: Slot, kind: SyntaxKind) -> (Slot, Option<NodeId>) {
        while let Some(id) = self.ast.get(slot) {
            if self.ast.kind(id) == kind {
                return (slot, Some(id));
            }
            slot = Slot::Next(id);
        }
        (slot, None)
    }
}
