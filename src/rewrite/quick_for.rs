// Quick for-loop sugar
//
//   for (i; n) body   ==>   for (unsigned int i = 0; i < n; ++i) body
//
// The header must hold exactly one `;`. The clause before it must name a
// single identifier and nothing else.

use crate::ast::{Ast, NodeId, Slot};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::syntax::SyntaxKind;

pub fn expand(mut ast: Ast, diagnostics: &mut Diagnostics) -> Ast {
    let mut loops = Vec::new();
    collect_for_loops(&ast, ast.head, &mut loops);
    for for_loop in loops {
        expand_loop(&mut ast, for_loop, diagnostics);
    }
    ast
}

// Outer loops first
fn collect_for_loops(ast: &Ast, start: Option<NodeId>, out: &mut Vec<NodeId>) {
    for id in ast.siblings(start) {
        if ast.kind(id) == SyntaxKind::ForLoop {
            out.push(id);
        }
        if ast.kind(id).is_group() {
            collect_for_loops(ast, ast.child(id), out);
        }
    }
}

fn whitespace(ast: &mut Ast, after: NodeId, text: &str) -> NodeId {
    let id = ast.insert_after(after, SyntaxKind::Whitespace);
    ast.set_text(id, text);
    id
}

fn ident(ast: &mut Ast, after: NodeId, text: &str) -> NodeId {
    let id = ast.insert_after(after, SyntaxKind::Ident);
    ast.set_text(id, text);
    id
}

fn expand_loop(ast: &mut Ast, for_loop: NodeId, diagnostics: &mut Diagnostics) {
    let line = ast.line(for_loop);
    let Some(parens) = ast
        .children(for_loop)
        .find(|id| ast.kind(*id) == SyntaxKind::Parens)
    else {
        return;
    };

    let Some(init) = ast.child(parens).filter(|id| ast.kind(*id) == SyntaxKind::Stmt) else {
        return;
    };
    let Some(bound) = ast.next(init) else {
        return;
    };
    if ast.kind(bound) == SyntaxKind::Stmt {
        // Regular three-clause header
        return;
    }
    if ast.siblings(Some(bound)).any(|id| ast.kind(id) == SyntaxKind::Stmt) {
        return;
    }

    // The init clause must name exactly one identifier
    let mut name: Option<NodeId> = None;
    for id in ast.children(init) {
        match ast.kind(id) {
            SyntaxKind::Ident => {
                if let Some(first) = name {
                    diagnostics.report(
                        DiagnosticKind::AmbiguousQuickFor,
                        line,
                        format!("loop already has an identifier: {}", ast.text(first)),
                    );
                    return;
                }
                name = Some(id);
            }
            kind if kind.is_trivia() => {}
            _ => {
                diagnostics.report(
                    DiagnosticKind::AmbiguousQuickFor,
                    line,
                    "just name an identifier for the loop",
                );
                return;
            }
        }
    }
    let Some(name) = name else {
        diagnostics.report(
            DiagnosticKind::AmbiguousQuickFor,
            line,
            "no identifier for the loop",
        );
        return;
    };

    // Split the bound run into leading whitespace, tokens, trailing whitespace
    let leading: Vec<NodeId> = ast
        .siblings(Some(bound))
        .take_while(|id| ast.kind(*id) == SyntaxKind::Whitespace)
        .collect();
    let Some(first_token) = ast.siblings(Some(bound)).nth(leading.len()) else {
        diagnostics.report(
            DiagnosticKind::AmbiguousQuickFor,
            line,
            "no bound for the loop",
        );
        return;
    };
    let tokens: Vec<NodeId> = ast.siblings(Some(first_token)).collect();
    let last_token = tokens
        .iter()
        .rposition(|id| ast.kind(*id) != SyntaxKind::Whitespace)
        .map_or(first_token, |i| tokens[i]);
    let trailing = ast.next(last_token);
    let wrap = ast
        .siblings(Some(first_token))
        .take_while(|id| Some(*id) != trailing)
        .filter(|id| !ast.kind(*id).is_trivia())
        .count()
        > 1;
    let var = ast.text(name).to_string();

    tracing::debug!(line, var = %var, "expanding quick for-loop");

    // Clause 1: unsigned int i = 0
    let unsigned = ast.insert_first_child(init, SyntaxKind::KwUnsigned);
    let ws = whitespace(ast, unsigned, " ");
    let int = ast.insert_after(ws, SyntaxKind::KwInt);
    whitespace(ast, int, " ");
    let ws = whitespace(ast, name, " ");
    let assign = ast.insert_after(ws, SyntaxKind::Assign);
    let ws = whitespace(ast, assign, " ");
    ident(ast, ws, "0");

    // Clause 2: i < n, keeping the bound's leading whitespace
    ast.set(Slot::Next(init), None);
    ast.set(Slot::Next(last_token), None);
    let cond = ast.insert_after(init, SyntaxKind::Stmt);
    let var_id = match leading.last() {
        Some(&ws_last) => {
            ast.set(Slot::Child(cond), Some(bound));
            ident(ast, ws_last, &var)
        }
        None => {
            let id = ast.insert_first_child(cond, SyntaxKind::Ident);
            ast.set_text(id, var.as_str());
            id
        }
    };
    let ws = whitespace(ast, var_id, " ");
    let lt = ast.insert_after(ws, SyntaxKind::Lt);
    let ws = whitespace(ast, lt, " ");
    if wrap {
        let group = ast.insert_after(ws, SyntaxKind::Parens);
        ast.set(Slot::Next(group), None);
        ast.set(Slot::Child(group), Some(first_token));
    } else {
        ast.set(Slot::Next(ws), Some(first_token));
    }

    // Clause 3: ++i, then whatever whitespace followed the bound
    let ws = whitespace(ast, cond, " ");
    let inc = ast.insert_after(ws, SyntaxKind::Inc);
    let var_id = ident(ast, inc, &var);
    ast.set(Slot::Next(var_id), trailing);
}
