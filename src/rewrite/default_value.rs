// Default-value expansion
//
//   T x = default;                ==>  T x = DEFAULT_T;
//   default int x = DEFAULT;      ==>  int x = DEFAULT_int;
//   default int x[] = DEFAULT;    ==>  int x[] = {DEFAULT_int};
//
// The statement has to match that shape exactly, otherwise it is left alone.

use crate::ast::{Ast, NodeId, Slot};
use crate::syntax::{KindFlags, SyntaxKind};

const MARKER: &str = "DEFAULT";

struct Shape {
    lead: Option<NodeId>,
    type_name: String,
    brackets: bool,
    marker: NodeId,
}

fn match_shape(ast: &Ast, stmt: NodeId) -> Option<Shape> {
    let tokens: Vec<NodeId> = ast
        .children(stmt)
        .filter(|id| ast.kind(*id) != SyntaxKind::Whitespace)
        .collect();

    let lead = tokens
        .first()
        .copied()
        .filter(|id| ast.kind(*id) == SyntaxKind::KwDefault);
    let rest = &tokens[usize::from(lead.is_some())..];

    let (ty, name, brackets, assign, marker) = match *rest {
        [ty, name, assign, marker] => (ty, name, None, assign, marker),
        [ty, name, brackets, assign, marker] => (ty, name, Some(brackets), assign, marker),
        _ => return None,
    };

    let type_name = match ast.kind(ty) {
        SyntaxKind::Ident => ast.text(ty).to_string(),
        kind if kind.flags().contains(KindFlags::BUILTIN_TYPE) => kind.spelling()?.to_string(),
        _ => return None,
    };
    if ast.kind(name) != SyntaxKind::Ident || ast.kind(assign) != SyntaxKind::Assign {
        return None;
    }
    if brackets.is_some_and(|id| ast.kind(id) != SyntaxKind::Brackets) {
        return None;
    }

    let is_marker = match ast.kind(marker) {
        SyntaxKind::KwDefault => true,
        SyntaxKind::Ident => lead.is_some() && ast.text(marker) == MARKER,
        _ => false,
    };
    if !is_marker {
        return None;
    }

    Some(Shape {
        lead,
        type_name,
        brackets: brackets.is_some(),
        marker,
    })
}

// Slot holding `target` within the child sequence of `parent`
fn slot_of(ast: &Ast, parent: NodeId, target: NodeId) -> Option<Slot> {
    let mut slot = Slot::Child(parent);
    while let Some(id) = ast.get(slot) {
        if id == target {
            return Some(slot);
        }
        slot = Slot::Next(id);
    }
    None
}

/// Expand the default marker of `stmt` in place. Returns whether anything
/// changed.
pub(super) fn expand(ast: &mut Ast, stmt: NodeId) -> bool {
    let Some(shape) = match_shape(ast, stmt) else {
        return false;
    };
    let line = ast.line(stmt);

    // Marker -> DEFAULT_<type>, braced for arrays
    let Some(marker_slot) = slot_of(ast, stmt, shape.marker) else {
        return false;
    };
    let value = ast.take_text(SyntaxKind::Ident, line, &format!("{}_{}", MARKER, shape.type_name));
    let replacement = if shape.brackets {
        let braces = ast.take(SyntaxKind::Braces, line);
        ast.set(Slot::Child(braces), Some(value));
        braces
    } else {
        value
    };
    let after = ast.next(shape.marker);
    ast.set(Slot::Next(replacement), after);
    ast.set(marker_slot, Some(replacement));
    ast.give(shape.marker);

    // Drop the leading `default` and the whitespace right after it
    if let Some(lead) = shape.lead {
        if let Some(lead_slot) = slot_of(ast, stmt, lead) {
            let mut after = ast.next(lead);
            if let Some(ws) = after.filter(|id| ast.kind(*id) == SyntaxKind::Whitespace) {
                after = ast.next(ws);
                ast.give(ws);
            }
            ast.set(lead_slot, after);
            ast.give(lead);
        }
    }

    tracing::trace!(line, type_name = %shape.type_name, "expanded default value");
    true
}

#[cfg(test)]
mod tests {
    use super::super::test_support::rewrite_str;

    #[test]
    fn test_trailing_default_keyword() {
        assert_eq!(rewrite_str("T x = default;"), "T x = DEFAULT_T;");
        assert_eq!(rewrite_str("  Point p =default;\n"), "  Point p =DEFAULT_Point;\n");
    }

    #[test]
    fn test_leading_default_marker() {
        assert_eq!(rewrite_str("default int x = DEFAULT;"), "int x = DEFAULT_int;");
        assert_eq!(
            rewrite_str("{\n  default double d = default;\n}"),
            "{\n  double d = DEFAULT_double;\n}"
        );
    }

    #[test]
    fn test_array_value_is_braced() {
        assert_eq!(
            rewrite_str("default int x[] = DEFAULT;"),
            "int x[] = {DEFAULT_int};"
        );
        assert_eq!(rewrite_str("Vec v[4] = default;"), "Vec v[4] = {DEFAULT_Vec};");
    }

    #[test]
    fn test_other_shapes_untouched() {
        for source in [
            "int x = DEFAULT;",
            "static int x = default;",
            "x = default;",
            "T x = default + 1;",
            "T *x = default;",
            "default int x = 0;",
            "T x(1) = default;",
        ] {
            assert_eq!(rewrite_str(source), source);
        }
    }

    #[test]
    fn test_switch_default_label_untouched() {
        let source = "switch (c) { default: y = 1; }";
        assert_eq!(rewrite_str(source), source);
    }
}
