use crate::ast::{Ast, NodeId, Slot};
use crate::syntax::SyntaxKind;

/// More than one token before the `=` means the clause declares something.
fn is_declaration(ast: &Ast, stmt: NodeId) -> bool {
    ast.children(stmt)
        .take_while(|id| ast.kind(*id) != SyntaxKind::Assign)
        .filter(|id| ast.kind(*id) != SyntaxKind::Whitespace)
        .count()
        > 1
}

/// Move a declaration out of a for-loop header into a new enclosing block.
///
/// `for (int i = 0; c; s) body` becomes `{int i = 0;for (; c; s) body}`.
/// `slot` is the link that holds `for_loop`; it receives the new block,
/// which is returned.
pub(super) fn hoist_declaration(ast: &mut Ast, slot: Slot, for_loop: NodeId) -> Option<NodeId> {
    let parens = ast
        .children(for_loop)
        .find(|id| ast.kind(*id) == SyntaxKind::Parens)?;
    let decl = ast
        .child(parens)
        .filter(|id| ast.kind(*id) == SyntaxKind::Stmt)?;
    // Only a regular three-clause header; a rejected `for (x; n)` stays as written
    let regular = ast
        .next(decl)
        .is_some_and(|id| ast.kind(id) == SyntaxKind::Stmt);
    if !regular || !is_declaration(ast, decl) {
        return None;
    }

    let line = ast.line(for_loop);
    tracing::trace!(line, "hoisting for-loop declaration");

    // Empty statement keeps the header's first clause
    let empty = ast.take(SyntaxKind::Stmt, line);
    let after_decl = ast.next(decl);
    ast.set(Slot::Next(empty), after_decl);
    ast.set(Slot::Child(parens), Some(empty));

    let block = ast.take(SyntaxKind::Braces, line);
    let after_loop = ast.next(for_loop);
    ast.set(Slot::Next(block), after_loop);
    ast.set(Slot::Child(block), Some(decl));
    ast.set(Slot::Next(decl), Some(for_loop));
    ast.set(Slot::Next(for_loop), None);
    ast.set(slot, Some(block));

    Some(block)
}
