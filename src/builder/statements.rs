use crate::ast::{NodeId, Slot};
use crate::error::BuildError;
use crate::syntax::{KindFlags, SyntaxKind};

// Start of a token run not yet terminated by `;`
#[derive(Debug, Clone, Copy)]
struct Pending {
    start: NodeId,
    slot: Slot,
    kind: SyntaxKind,
}

impl<'a> super::Builder<'a> {
    /// Group the sequence held by `head` into statements, recursing into
    /// brace groups and control structures
    pub(super) fn build_stmts(&mut self, head: Slot, depth: usize) -> Result<(), BuildError> {
        self.check_depth(depth, head)?;

        let mut pending: Option<Pending> = None;
        let mut slot = head;

        while let Some(mut id) = self.ast.get(slot) {
            if self.ast.kind(id) == SyntaxKind::Braces {
                self.prebrace(slot);
                match self.ast.get(slot) {
                    Some(moved) => id = moved,
                    None => break,
                }
            }

            let kind = self.ast.kind(id);
            match kind {
                SyntaxKind::Directive | SyntaxKind::LineComment | SyntaxKind::BlockComment => {}
                kind if kind.flags().contains(KindFlags::CONTROL) => {
                    self.build_ctrl(id, depth)?;
                    pending = None;
                }
                SyntaxKind::Braces => {
                    self.build_stmts(Slot::Child(id), depth + 1)?;
                    // `do { ... } while (...)` keeps its run open across the block
                    if pending.map(|p| p.kind) != Some(SyntaxKind::KwDo) {
                        pending = None;
                    }
                }
                SyntaxKind::Colon => {
                    // Labels and case colons end the run without forming a statement
                    pending = None;
                }
                SyntaxKind::Semicolon => {
                    self.ast.set_kind(id, SyntaxKind::Stmt);
                    if let Some(run) = pending.take() {
                        self.ast.set(slot, None);
                        self.ast.set(run.slot, Some(id));
                        self.ast.set(Slot::Child(id), Some(run.start));
                    }
                }
                _ => {
                    if pending.is_none() {
                        pending = Some(Pending {
                            start: id,
                            slot,
                            kind,
                        });
                    }
                }
            }

            slot = Slot::Next(id);
        }
        Ok(())
    }
}
