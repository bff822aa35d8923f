// Recoverable findings collected while a document is transformed.
//
// Fatal conditions are `Err` values (see `error.rs`); everything here lets the
// pipeline carry on with a best-effort result.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnterminatedLiteral,
    UnterminatedComment,
    UnmatchedClose,
    MismatchedClose,
    UnclosedGroup,
    AmbiguousQuickFor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, line: u32, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            line,
            message: message.into(),
        };
        tracing::debug!(?kind, line, message = %diagnostic.message, "diagnostic");
        self.list.push(diagnostic);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.list.iter().filter(|d| d.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_count() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());

        diags.report(DiagnosticKind::UnclosedGroup, 4, "unclosed '(' opened here");
        diags.report(DiagnosticKind::UnclosedGroup, 2, "unclosed '{' opened here");
        diags.report(DiagnosticKind::UnterminatedLiteral, 9, "unterminated string literal");

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count(DiagnosticKind::UnclosedGroup), 2);
        assert_eq!(diags.count(DiagnosticKind::MismatchedClose), 0);
    }

    #[test]
    fn test_display() {
        let mut diags = Diagnostics::new();
        diags.report(DiagnosticKind::UnmatchedClose, 12, "unmatched closing ')'");
        let shown: Vec<String> = diags.iter().map(|d| d.to_string()).collect();
        assert_eq!(shown, vec!["line 12: unmatched closing ')'"]);
    }
}
