use crate::ast::Slot;
use crate::syntax::{KindFlags, SyntaxKind};

impl<'a> super::Builder<'a> {
    /// Rewrite a brace group opened with `{:` so the control keyword after
    /// the colon owns the block.
    ///
    /// `{: for (i; n) a; b;}` becomes `for (i; n){ a; b;}`. The colon node is
    /// returned to the pool. When the body ends at a `;` (plain statements
    /// such as `{: return x; ...}`), the brace group takes the place of that
    /// `;` and the `;` is returned to the pool too.
    pub(super) fn prebrace(&mut self, slot: Slot) {
        let Some(braces) = self.ast.get(slot) else {
            return;
        };

        let (colon_slot, colon) = self.skip_trivia(Slot::Child(braces));
        let Some(colon) = colon.filter(|id| self.ast.kind(*id) == SyntaxKind::Colon) else {
            return;
        };

        let (ctrl_slot, ctrl) = self.skip_trivia(Slot::Next(colon));
        let Some(ctrl) = ctrl else {
            return;
        };
        let ctrl_kind = self.ast.kind(ctrl);
        if !ctrl_kind.flags().contains(KindFlags::KEYWORD) {
            return;
        }

        let mut body_slot = Slot::Next(ctrl);
        if ctrl_kind == SyntaxKind::KwElse {
            body_slot = self.skip_trivia(body_slot).0;
        }
        let else_if = ctrl_kind == SyntaxKind::KwElse
            && self.ast.get(body_slot).map(|id| self.ast.kind(id)) == Some(SyntaxKind::KwIf);

        let (body_slot, body) = match ctrl_kind {
            SyntaxKind::KwFor | SyntaxKind::KwWhile | SyntaxKind::KwSwitch | SyntaxKind::KwIf => {
                self.seek(body_slot, SyntaxKind::Parens)
            }
            SyntaxKind::KwElse if else_if => self.seek(body_slot, SyntaxKind::Parens),
            SyntaxKind::KwElse | SyntaxKind::KwDo => (ctrl_slot, Some(ctrl)),
            _ => self.seek(body_slot, SyntaxKind::Semicolon),
        };
        let Some(body) = body else {
            return;
        };

        tracing::trace!(line = self.ast.line(ctrl), keyword = ?ctrl_kind, "moving label block");

        // Order matters: ctrl_slot may be the colon's next link
        self.ast.set(slot, Some(ctrl));
        let after_body = self.ast.next(body);
        self.ast.set(ctrl_slot, after_body);
        let after_colon = self.ast.next(colon);
        self.ast.set(colon_slot, after_colon);
        self.ast.give(colon);

        if self.ast.kind(body) == SyntaxKind::Semicolon {
            self.ast.set(body_slot, Some(braces));
            self.ast.give(body);
        } else {
            self.ast.set(Slot::Next(body), Some(braces));
        }
    }
}
