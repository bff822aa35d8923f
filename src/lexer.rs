use std::ops::ControlFlow;

use crate::ast::{Ast, NodeId, Slot};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::LexError;
use crate::limits::TransformLimits;
use crate::syntax::{self, KeywordTable, SyntaxKind};

// Characters that end an identifier/whitespace run
const DELIMITERS: &[u8] = b"'\"(){}[];#+-*/%&^|~!.,?:><=";

// Lexer
//
// Produces the flat token sequence directly into the arena. Brackets are
// nested on the fly: an opening bracket becomes a group node and tokens are
// appended to its child sequence until the matching close.

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    keywords: &'a KeywordTable,
    limits: &'a TransformLimits,
    diagnostics: &'a mut Diagnostics,
    ast: Ast,
    insert: Slot,           // where the next token is linked
    last: Option<NodeId>,   // previously emitted token, for operator merging
    open: Vec<NodeId>,      // unclosed groups, innermost last
    token_count: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(
        source: &'a str,
        keywords: &'a KeywordTable,
        limits: &'a TransformLimits,
        diagnostics: &'a mut Diagnostics,
    ) -> Result<Self, LexError> {
        // Check input size limit
        if source.len() > limits.max_input_size {
            return Err(LexError::InputTooLarge {
                size: source.len(),
                max: limits.max_input_size,
            });
        }

        Ok(Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            keywords,
            limits,
            diagnostics,
            ast: Ast::new(),
            insert: Slot::Root,
            last: None,
            open: Vec::new(),
            token_count: 0,
        })
    }

    // Main tokenization loop

    pub fn run(mut self) -> Result<Ast, LexError> {
        loop {
            let start = self.pos;
            let end = self.bytes[start..]
                .iter()
                .position(|c| DELIMITERS.contains(c))
                .map_or(self.bytes.len(), |i| start + i);

            self.lex_run(start, end)?;

            if end >= self.bytes.len() {
                self.pos = self.bytes.len();
                break;
            }

            self.pos = end + 1;
            if self.lex_delimiter(self.bytes[end])?.is_break() {
                // Structure is broken past this point; keep what we have.
                return Ok(self.ast);
            }
        }

        while let Some(group) = self.open.pop() {
            let opener = match self.ast.kind(group) {
                SyntaxKind::Parens => '(',
                SyntaxKind::Braces => '{',
                _ => '[',
            };
            let line = self.ast.line(group);
            self.diagnostics.report(
                DiagnosticKind::UnclosedGroup,
                line,
                format!("unclosed '{}' opened on line {}", opener, line),
            );
        }

        Ok(self.ast)
    }

    // Node emission

    fn emit(&mut self, kind: SyntaxKind) -> Result<NodeId, LexError> {
        if self.token_count >= self.limits.max_token_count {
            return Err(LexError::TooManyTokens {
                line: self.line,
                max: self.limits.max_token_count,
            });
        }
        self.token_count += 1;

        let id = self.ast.take(kind, self.line);
        self.ast.set(self.insert, Some(id));
        self.insert = Slot::Next(id);
        self.last = Some(id);
        Ok(id)
    }

    fn emit_text(&mut self, kind: SyntaxKind, text: &str) -> Result<NodeId, LexError> {
        let id = self.emit(kind)?;
        self.ast[id].text.push_str(text);
        Ok(id)
    }

    fn last_kind(&self) -> Option<SyntaxKind> {
        self.last.map(|id| self.ast.kind(id))
    }

    // Whitespace and identifier runs between delimiters

    fn lex_run(&mut self, start: usize, end: usize) -> Result<(), LexError> {
        let source = self.source;
        let mut i = start;

        while i < end {
            let ws_end = i + self.bytes[i..end].iter().take_while(|c| is_space(**c)).count();
            if ws_end > i {
                let text = &source[i..ws_end];
                self.emit_text(SyntaxKind::Whitespace, text)?;
                self.line += count_newlines(text);
            }
            i = ws_end;
            if i >= end {
                break;
            }

            let word_end = i + self.bytes[i..end].iter().take_while(|c| !is_space(**c)).count();
            let word = &source[i..word_end];
            match self.keywords.lookup(word) {
                Some(kind) => {
                    self.emit(kind)?;
                }
                None => {
                    self.emit_text(SyntaxKind::Ident, word)?;
                }
            }
            i = word_end;
        }
        Ok(())
    }

    // Delimiters

    fn lex_delimiter(&mut self, c: u8) -> Result<ControlFlow<()>, LexError> {
        match c {
            b'\'' => self.lex_quoted(SyntaxKind::CharLit, '\'')?,
            b'"' => self.lex_quoted(SyntaxKind::StringLit, '"')?,
            b'(' => self.open_group(SyntaxKind::Parens)?,
            b'{' => self.open_group(SyntaxKind::Braces)?,
            b'[' => self.open_group(SyntaxKind::Brackets)?,
            b')' | b'}' | b']' => return Ok(self.close_group(c)),
            b'#' => self.lex_directive()?,
            b'/' if self.last_kind() == Some(SyntaxKind::Div) => self.lex_line_comment(),
            b'*' if self.last_kind() == Some(SyntaxKind::Div) => self.lex_block_comment(),
            _ => self.lex_operator(c)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn lex_operator(&mut self, c: u8) -> Result<(), LexError> {
        if let Some(merged) = self.last_kind().and_then(|prev| syntax::merge_operator(prev, c)) {
            if let Some(last) = self.last {
                self.ast.set_kind(last, merged);
                return Ok(());
            }
        }

        if let Some(kind) = syntax::single_char_operator(c) {
            self.emit(kind)?;
        }
        Ok(())
    }

    fn open_group(&mut self, kind: SyntaxKind) -> Result<(), LexError> {
        if self.open.len() >= self.limits.max_nesting_depth {
            return Err(LexError::TooDeep {
                line: self.line,
                max: self.limits.max_nesting_depth,
            });
        }

        let group = self.emit(kind)?;
        self.open.push(group);
        self.insert = Slot::Child(group);
        Ok(())
    }

    fn close_group(&mut self, c: u8) -> ControlFlow<()> {
        let Some(group) = self.open.pop() else {
            self.diagnostics.report(
                DiagnosticKind::UnmatchedClose,
                self.line,
                format!("unmatched closing '{}'", c as char),
            );
            return ControlFlow::Break(());
        };

        let expected = match c {
            b')' => SyntaxKind::Parens,
            b'}' => SyntaxKind::Braces,
            _ => SyntaxKind::Brackets,
        };
        if self.ast.kind(group) != expected {
            self.diagnostics.report(
                DiagnosticKind::MismatchedClose,
                self.line,
                format!(
                    "mismatched closing '{}' for group opened on line {}",
                    c as char,
                    self.ast.line(group)
                ),
            );
            return ControlFlow::Break(());
        }

        self.insert = Slot::Next(group);
        self.last = Some(group);
        ControlFlow::Continue(())
    }

    // Literals

    fn lex_quoted(&mut self, kind: SyntaxKind, delim: char) -> Result<(), LexError> {
        let id = self.emit(kind)?;
        let (text, closed) = self.scan_escaped(delim);
        let newlines = count_newlines(&text);
        self.ast[id].text = text;

        if !closed {
            let what = if kind == SyntaxKind::CharLit { "character" } else { "string" };
            self.diagnostics.report(
                DiagnosticKind::UnterminatedLiteral,
                self.line,
                format!("unterminated {} literal", what),
            );
        }
        self.line += newlines;
        Ok(())
    }

    /// Consume up to the next unescaped `delim`. A delimiter preceded by an
    /// odd run of backslashes belongs to the literal.
    fn scan_escaped(&mut self, delim: char) -> (String, bool) {
        let mut text = String::new();

        loop {
            let rest = &self.source[self.pos..];
            let Some(at) = rest.find(delim) else {
                text.push_str(rest);
                self.pos = self.bytes.len();
                return (text, false);
            };

            text.push_str(&rest[..at]);
            self.pos += at + 1;

            let backslashes = text.bytes().rev().take_while(|c| *c == b'\\').count();
            if backslashes % 2 == 0 {
                return (text, true);
            }
            text.push(delim);
        }
    }

    // Comments and directives

    /// Rest of the current physical line, consuming its newline.
    fn rest_of_line(&mut self) -> &'a str {
        let source = self.source;
        let rest = &source[self.pos..];
        match rest.find('\n') {
            Some(at) => {
                self.pos += at + 1;
                self.line += 1;
                &rest[..at]
            }
            None => {
                self.pos = self.bytes.len();
                rest
            }
        }
    }

    fn lex_line_comment(&mut self) {
        let text = self.rest_of_line();
        if let Some(id) = self.last {
            self.ast.set_kind(id, SyntaxKind::LineComment);
            self.ast[id].text.push_str(text);
        }
    }

    fn lex_block_comment(&mut self) {
        let source = self.source;
        let rest = &source[self.pos..];
        let text = match rest.find("*/") {
            Some(at) => {
                self.pos += at + 2;
                &rest[..at]
            }
            None => {
                self.pos = self.bytes.len();
                self.diagnostics.report(
                    DiagnosticKind::UnterminatedComment,
                    self.line,
                    "unterminated block comment",
                );
                rest
            }
        };

        if let Some(id) = self.last {
            self.ast.set_kind(id, SyntaxKind::BlockComment);
            self.ast[id].text.push_str(text);
        }
        self.line += count_newlines(text);
    }

    fn lex_directive(&mut self) -> Result<(), LexError> {
        let id = self.emit(SyntaxKind::Directive)?;
        let mut text = self.rest_of_line().to_string();

        // Backslash continuation joins the following physical lines
        while text.trim_end_matches('\r').ends_with('\\') && self.pos < self.bytes.len() {
            text.push('\n');
            text.push_str(self.rest_of_line());
        }

        self.ast[id].text = text;
        Ok(())
    }
}

// Helper functions

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

pub(crate) fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|c| *c == b'\n').count() as u32
}

// Public API

pub fn lex(
    source: &str,
    keywords: &KeywordTable,
    limits: &TransformLimits,
    diagnostics: &mut Diagnostics,
) -> Result<Ast, LexError> {
    let lexer = Lexer::new(source, keywords, limits, diagnostics)?;
    let ast = lexer.run()?;
    tracing::debug!(nodes = ast.live_count(), "lexed");
    Ok(ast)
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    // Helper
    fn lex_str(source: &str) -> (Ast, Diagnostics) {
        let keywords = KeywordTable::new();
        let limits = TransformLimits::default();
        let mut diags = Diagnostics::new();
        let ast = lex(source, &keywords, &limits, &mut diags).unwrap();
        (ast, diags)
    }

    fn top_kinds(ast: &Ast) -> Vec<SyntaxKind> {
        ast.siblings(ast.head).map(|id| ast.kind(id)).collect()
    }

    fn single(source: &str) -> SyntaxKind {
        let (ast, _) = lex_str(source);
        let kinds = top_kinds(&ast);
        assert_eq!(kinds.len(), 1, "{:?} lexed as {:?}", source, kinds);
        kinds[0]
    }

    #[test]
    fn test_operator_merge_yields_one_node() {
        assert_eq!(single("+"), SyntaxKind::Add);
        assert_eq!(single("++"), SyntaxKind::Inc);
        assert_eq!(single("+="), SyntaxKind::AddAssign);
    }

    #[test]
    fn test_all_compound_operators() {
        assert_eq!(single("--"), SyntaxKind::Dec);
        assert_eq!(single("->"), SyntaxKind::Arrow);
        assert_eq!(single("&&"), SyntaxKind::And);
        assert_eq!(single("||"), SyntaxKind::Or);
        assert_eq!(single("<<"), SyntaxKind::Shl);
        assert_eq!(single(">>"), SyntaxKind::Shr);
        assert_eq!(single("<="), SyntaxKind::LtEq);
        assert_eq!(single(">="), SyntaxKind::GtEq);
        assert_eq!(single("=="), SyntaxKind::Eq);
        assert_eq!(single("!="), SyntaxKind::NotEq);
        assert_eq!(single("-="), SyntaxKind::SubAssign);
        assert_eq!(single("*="), SyntaxKind::MulAssign);
        assert_eq!(single("/="), SyntaxKind::DivAssign);
        assert_eq!(single("%="), SyntaxKind::ModAssign);
        assert_eq!(single("&="), SyntaxKind::BitAndAssign);
        assert_eq!(single("^="), SyntaxKind::BitXorAssign);
        assert_eq!(single("|="), SyntaxKind::BitOrAssign);
        assert_eq!(single("<<="), SyntaxKind::ShlAssign);
        assert_eq!(single(">>="), SyntaxKind::ShrAssign);
    }

    #[test]
    fn test_merge_needs_adjacency() {
        let (ast, _) = lex_str("+ +");
        assert_eq!(
            top_kinds(&ast),
            vec![SyntaxKind::Add, SyntaxKind::Whitespace, SyntaxKind::Add]
        );

        let (ast, _) = lex_str("a+++b");
        assert_eq!(
            top_kinds(&ast),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Inc,
                SyntaxKind::Add,
                SyntaxKind::Ident
            ]
        );

        let (ast, _) = lex_str("x=-1");
        assert_eq!(
            top_kinds(&ast),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Assign,
                SyntaxKind::Sub,
                SyntaxKind::Ident
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let (ast, _) = lex_str("unsigned int count0");
        let ids: Vec<_> = ast.siblings(ast.head).collect();
        assert_eq!(
            top_kinds(&ast),
            vec![
                SyntaxKind::KwUnsigned,
                SyntaxKind::Whitespace,
                SyntaxKind::KwInt,
                SyntaxKind::Whitespace,
                SyntaxKind::Ident
            ]
        );
        assert_eq!(ast.text(ids[0]), "");
        assert_eq!(ast.text(ids[1]), " ");
        assert_eq!(ast.text(ids[4]), "count0");
    }

    #[test]
    fn test_numbers_are_identifier_runs() {
        let (ast, _) = lex_str("1.5");
        assert_eq!(
            top_kinds(&ast),
            vec![SyntaxKind::Ident, SyntaxKind::Dot, SyntaxKind::Ident]
        );
    }

    #[test]
    fn test_string_and_char_literals() {
        let (ast, diags) = lex_str(r#"s = "say \"hi\""; c = '\\';"#);
        assert!(diags.is_empty());

        let literals: Vec<_> = ast
            .siblings(ast.head)
            .filter(|id| {
                matches!(ast.kind(*id), SyntaxKind::StringLit | SyntaxKind::CharLit)
            })
            .map(|id| (ast.kind(id), ast.text(id).to_string()))
            .collect();
        assert_eq!(
            literals,
            vec![
                (SyntaxKind::StringLit, r#"say \"hi\""#.to_string()),
                (SyntaxKind::CharLit, r"\\".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_literal_reports_and_continues() {
        let (ast, diags) = lex_str("x = \"abc");
        assert_eq!(diags.count(DiagnosticKind::UnterminatedLiteral), 1);
        let last = ast.siblings(ast.head).last().unwrap();
        assert_eq!(ast.kind(last), SyntaxKind::StringLit);
        assert_eq!(ast.text(last), "abc");
    }

    #[test]
    fn test_unterminated_char_literal() {
        let (ast, diags) = lex_str("c = 'x");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::UnterminatedLiteral), 1);
        assert!(diags.iter().next().unwrap().message.contains("character"));
        let last = ast.siblings(ast.head).last().unwrap();
        assert_eq!(ast.kind(last), SyntaxKind::CharLit);
        assert_eq!(ast.text(last), "x");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (ast, diags) = lex_str("a /* open");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::UnterminatedComment), 1);
        let last = ast.siblings(ast.head).last().unwrap();
        assert_eq!(ast.kind(last), SyntaxKind::BlockComment);
        assert_eq!(ast.text(last), " open");
    }

    #[test]
    fn test_comments() {
        let (ast, diags) = lex_str("a // note\n/* multi\nline */b");
        assert!(diags.is_empty());
        let ids: Vec<_> = ast.siblings(ast.head).collect();
        assert_eq!(
            top_kinds(&ast),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Whitespace,
                SyntaxKind::LineComment,
                SyntaxKind::BlockComment,
                SyntaxKind::Ident
            ]
        );
        assert_eq!(ast.text(ids[2]), " note");
        assert_eq!(ast.text(ids[3]), " multi\nline ");
        assert_eq!(ast.line(ids[3]), 2);
        assert_eq!(ast.line(ids[4]), 3);
    }

    #[test]
    fn test_division_stays_division() {
        let (ast, _) = lex_str("a / b");
        assert_eq!(
            top_kinds(&ast),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Whitespace,
                SyntaxKind::Div,
                SyntaxKind::Whitespace,
                SyntaxKind::Ident
            ]
        );
    }

    #[test]
    fn test_multiline_directive() {
        let (ast, _) = lex_str("#define F(x) \\\n  (x)\nint y;");
        let ids: Vec<_> = ast.siblings(ast.head).collect();
        assert_eq!(ast.kind(ids[0]), SyntaxKind::Directive);
        assert_eq!(ast.text(ids[0]), "define F(x) \\\n  (x)");
        assert_eq!(ast.kind(ids[1]), SyntaxKind::KwInt);
        assert_eq!(ast.line(ids[1]), 3);
    }

    #[test]
    fn test_groups_nest() {
        let (ast, diags) = lex_str("f(a[1]){x;}");
        assert!(diags.is_empty());
        assert_eq!(
            top_kinds(&ast),
            vec![SyntaxKind::Ident, SyntaxKind::Parens, SyntaxKind::Braces]
        );

        let parens = ast.siblings(ast.head).nth(1).unwrap();
        let inner: Vec<_> = ast.children(parens).map(|id| ast.kind(id)).collect();
        assert_eq!(inner, vec![SyntaxKind::Ident, SyntaxKind::Brackets]);

        let braces = ast.siblings(ast.head).nth(2).unwrap();
        let inner: Vec<_> = ast.children(braces).map(|id| ast.kind(id)).collect();
        assert_eq!(inner, vec![SyntaxKind::Ident, SyntaxKind::Semicolon]);
    }

    #[test]
    fn test_empty_group_has_no_child() {
        let (ast, _) = lex_str("()");
        let parens = ast.head.unwrap();
        assert_eq!(ast.kind(parens), SyntaxKind::Parens);
        assert_eq!(ast.child(parens), None);
    }

    #[test]
    fn test_unmatched_close_stops_lexing() {
        let (ast, diags) = lex_str("a) b c");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::UnmatchedClose), 1);
        assert_eq!(top_kinds(&ast), vec![SyntaxKind::Ident]);
    }

    #[test]
    fn test_mismatched_close() {
        let (_, diags) = lex_str("(a]");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::MismatchedClose), 1);
    }

    #[test]
    fn test_unclosed_groups_reported_each() {
        let (_, diags) = lex_str("{\n(\n[");
        assert_eq!(diags.count(DiagnosticKind::UnclosedGroup), 3);
        let lines: Vec<u32> = diags.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 2, 1]);
        assert!(diags.iter().next().unwrap().message.contains("'['"));
    }

    #[test]
    fn test_input_too_large() {
        let keywords = KeywordTable::new();
        let mut limits = TransformLimits::default();
        limits.max_input_size = 4;
        let mut diags = Diagnostics::new();
        let result = lex("int x;", &keywords, &limits, &mut diags);
        assert!(matches!(result, Err(LexError::InputTooLarge { size: 6, max: 4 })));
    }

    #[test]
    fn test_nesting_limit() {
        let keywords = KeywordTable::new();
        let mut limits = TransformLimits::default();
        limits.max_nesting_depth = 2;
        let mut diags = Diagnostics::new();
        assert!(lex("((x))", &keywords, &limits, &mut diags).is_ok());
        let result = lex("(((x)))", &keywords, &limits, &mut diags);
        assert!(matches!(result, Err(LexError::TooDeep { max: 2, .. })));
    }

    #[test]
    fn test_token_limit() {
        let keywords = KeywordTable::new();
        let mut limits = TransformLimits::default();
        limits.max_token_count = 3;
        let mut diags = Diagnostics::new();
        let result = lex("a b c d", &keywords, &limits, &mut diags);
        assert!(matches!(result, Err(LexError::TooManyTokens { max: 3, .. })));
    }
}
