// Rewrite passes over the built tree
//
// Quick for-loop sugar runs first as its own pass. The remaining rewrites
// share one depth-first walk that finishes a node's children before the
// node itself:
//   line comment  -> "\n" whitespace
//   directive     -> blank lines, when the filter drops it
//   for-loop      -> declaration hoisted into an enclosing block
//   statement     -> default-value marker expanded
mod default_value;
mod directive;
mod hoist;
mod quick_for;

pub use directive::DirectiveFilter;

use crate::ast::{Ast, Slot};
use crate::diagnostics::Diagnostics;
use crate::syntax::SyntaxKind;

#[derive(Debug, Clone, Copy)]
pub struct RewriteOptions<'a> {
    pub directives: &'a DirectiveFilter,
    pub hoist_for_decls: bool,
    pub strip_line_comments: bool,
}

#[derive(Debug, Default)]
struct RewriteStats {
    line_comments: usize,
    directives: usize,
    hoisted: usize,
    defaults: usize,
}

pub fn rewrite(ast: Ast, options: &RewriteOptions<'_>, diagnostics: &mut Diagnostics) -> Ast {
    let ast = quick_for::expand(ast, diagnostics);

    let mut walker = Walker {
        ast,
        options,
        stats: RewriteStats::default(),
    };
    walker.sequence(Slot::Root);

    let stats = walker.stats;
    tracing::debug!(
        line_comments = stats.line_comments,
        directives = stats.directives,
        hoisted = stats.hoisted,
        defaults = stats.defaults,
        "rewrote tree"
    );
    walker.ast
}

struct Walker<'o, 'a> {
    ast: Ast,
    options: &'o RewriteOptions<'a>,
    stats: RewriteStats,
}

impl Walker<'_, '_> {
    fn sequence(&mut self, head: Slot) {
        let mut slot = head;

        while let Some(mut id) = self.ast.get(slot) {
            let kind = self.ast.kind(id);
            if kind.is_group() {
                self.sequence(Slot::Child(id));
            }

            match kind {
                SyntaxKind::LineComment if self.options.strip_line_comments => {
                    self.ast.set_kind(id, SyntaxKind::Whitespace);
                    self.ast.set_text(id, "\n");
                    self.stats.line_comments += 1;
                }
                SyntaxKind::Directive => {
                    if self.options.directives.should_delete(self.ast.text(id)) {
                        tracing::trace!(line = self.ast.line(id), "dropping directive");
                        let blank = DirectiveFilter::blank_lines(self.ast.text(id));
                        self.ast.set_kind(id, SyntaxKind::Whitespace);
                        self.ast.set_text(id, blank);
                        self.stats.directives += 1;
                    }
                }
                SyntaxKind::ForLoop if self.options.hoist_for_decls => {
                    if let Some(block) = hoist::hoist_declaration(&mut self.ast, slot, id) {
                        id = block;
                        self.stats.hoisted += 1;
                    }
                }
                SyntaxKind::Stmt => {
                    if default_value::expand(&mut self.ast, id) {
                        self.stats.defaults += 1;
                    }
                }
                _ => {}
            }

            slot = Slot::Next(id);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{rewrite_str, rewrite_with};
    use super::*;
    use crate::builder::test_support::to_tree;
    use crate::emit::emit_source;

    #[test]
    fn test_line_comments_become_newlines() {
        assert_eq!(rewrite_str("a; // one\nb; // two"), "a; \nb; \n");
    }

    #[test]
    fn test_line_comments_kept_when_disabled() {
        let filter = DirectiveFilter::default();
        let options = RewriteOptions {
            directives: &filter,
            hoist_for_decls: true,
            strip_line_comments: false,
        };
        let mut diags = Diagnostics::new();
        let ast = rewrite(to_tree("a; // one\n").unwrap(), &options, &mut diags);
        assert_eq!(emit_source(&ast), "a; // one\n");
    }

    #[test]
    fn test_pragma_deleted_keeps_lines() {
        let filter = DirectiveFilter::new(["foo"], false);
        assert_eq!(rewrite_with("#pragma foo\nX\n", &filter, true), "\nX\n");
        assert_eq!(
            rewrite_with("#pragma foo \\\n  bar\nX;\n", &filter, true),
            "\n\nX;\n"
        );
        assert_eq!(
            rewrite_with("#pragma once\nX\n", &filter, true),
            "#pragma once\nX\n"
        );
    }

    #[test]
    fn test_directives_inside_blocks() {
        let filter = DirectiveFilter::new(["omp"], true);
        assert_eq!(
            rewrite_with(
                "#include \"a.h\"\nvoid f() {\n#pragma omp parallel\n  x;\n}\n",
                &filter,
                true
            ),
            "\nvoid f() {\n\n  x;\n}\n"
        );
    }

    #[test]
    fn test_passes_compose() {
        assert_eq!(
            rewrite_str("for (i; n) { // step\n  default int v = DEFAULT;\n}\n"),
            "{unsigned int i = 0;for (; i < n; ++i) { \n  int v = DEFAULT_int;\n}}\n"
        );
    }
}
