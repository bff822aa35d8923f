// Emitter - turns the tree back into C source, or into the numeric
// s-expression dump used for debugging the builder.

use std::fmt::Write;

use crate::ast::{Ast, NodeId};
use crate::syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Source,
    Sexp,
}

pub fn emit(ast: &Ast, format: OutputFormat) -> String {
    match format {
        OutputFormat::Source => emit_source(ast),
        OutputFormat::Sexp => emit_sexp(ast),
    }
}

/// Source text of the whole tree.
pub fn emit_source(ast: &Ast) -> String {
    let mut emitter = SourceEmitter {
        ast,
        out: String::new(),
    };
    emitter.sequence(ast.head);
    emitter.out
}

struct SourceEmitter<'a> {
    ast: &'a Ast,
    out: String,
}

impl SourceEmitter<'_> {
    fn sequence(&mut self, start: Option<NodeId>) {
        for id in self.ast.siblings(start) {
            self.node(id);
        }
    }

    fn node(&mut self, id: NodeId) {
        let ast = self.ast;
        let kind = ast.kind(id);
        let text = ast.text(id);

        match kind {
            SyntaxKind::Whitespace | SyntaxKind::Ident => self.out.push_str(text),
            SyntaxKind::CharLit => self.quoted('\'', text),
            SyntaxKind::StringLit => self.quoted('"', text),
            SyntaxKind::LineComment => {
                self.out.push_str("//");
                self.out.push_str(text);
                self.out.push('\n');
            }
            SyntaxKind::BlockComment => {
                self.out.push_str("/*");
                self.out.push_str(text);
                self.out.push_str("*/");
            }
            SyntaxKind::Directive => {
                self.out.push('#');
                self.out.push_str(text);
                self.out.push('\n');
            }
            SyntaxKind::Parens => self.bracketed('(', id, ')'),
            SyntaxKind::Braces => self.bracketed('{', id, '}'),
            SyntaxKind::Brackets => self.bracketed('[', id, ']'),
            SyntaxKind::Stmt => {
                self.sequence(ast.child(id));
                self.out.push(';');
            }
            SyntaxKind::ForLoop => self.control("for", id),
            SyntaxKind::WhileLoop => self.control("while", id),
            SyntaxKind::If => self.control("if", id),
            SyntaxKind::Else => self.control("else", id),
            _ => {
                if let Some(spelling) = kind.spelling() {
                    self.out.push_str(spelling);
                } else {
                    tracing::warn!(?kind, "kind has no spelling");
                }
            }
        }
    }

    fn quoted(&mut self, quote: char, text: &str) {
        self.out.push(quote);
        self.out.push_str(text);
        self.out.push(quote);
    }

    fn bracketed(&mut self, open: char, id: NodeId, close: char) {
        self.out.push(open);
        self.sequence(self.ast.child(id));
        self.out.push(close);
    }

    fn control(&mut self, keyword: &str, id: NodeId) {
        self.out.push_str(keyword);
        self.sequence(self.ast.child(id));
    }
}

/// Numeric dump: `tag` per node, `tag:(...)` for groups, one line per tree.
pub fn emit_sexp(ast: &Ast) -> String {
    let mut out = String::new();
    sexp_sequence(ast, ast.head, &mut out);
    out.push('\n');
    out
}

fn sexp_sequence(ast: &Ast, start: Option<NodeId>, out: &mut String) {
    for (i, id) in ast.siblings(start).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let kind = ast.kind(id);
        let _ = write!(out, "{}", kind.tag());
        if kind.is_group() {
            out.push_str(":(");
            sexp_sequence(ast, ast.child(id), out);
            out.push(')');
        }
    }
}
