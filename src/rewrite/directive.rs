use rustc_hash::FxHashSet;

use crate::config::TransformSettings;
use crate::lexer::count_newlines;

/// Decides which preprocessor directives are dropped from the output.
///
/// Directive text is everything after the `#`, continuation lines included.
#[derive(Debug, Clone, Default)]
pub struct DirectiveFilter {
    pragmas: FxHashSet<String>,
    quote_includes: bool,
}

impl DirectiveFilter {
    pub fn new<I, S>(pragmas: I, quote_includes: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pragmas: pragmas.into_iter().map(Into::into).collect(),
            quote_includes,
        }
    }

    pub fn from_settings(settings: &TransformSettings) -> Self {
        Self::new(settings.no_pragmas.iter().cloned(), settings.no_quote_includes)
    }

    pub fn is_empty(&self) -> bool {
        self.pragmas.is_empty() && !self.quote_includes
    }

    pub fn should_delete(&self, text: &str) -> bool {
        let text = text.trim_start_matches([' ', '\t']);

        if let Some(rest) = directive_argument(text, "include") {
            return self.quote_includes && rest.starts_with('"');
        }
        if let Some(rest) = directive_argument(text, "pragma") {
            let name_end = rest
                .find(|c: char| c == '\\' || c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            return !name.is_empty() && self.pragmas.contains(name);
        }
        false
    }

    /// Replacement for a deleted directive: one newline for the directive
    /// line plus one per continuation line, so line numbers stay put.
    pub fn blank_lines(text: &str) -> String {
        "\n".repeat(1 + count_newlines(text) as usize)
    }
}

// Text after `name` when the directive is `name` followed by a break
fn directive_argument<'t>(text: &'t str, name: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(name)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_ascii_whitespace() || c == '"' || c == '<' || c == '\\' => {
            Some(rest.trim_start_matches([' ', '\t']))
        }
        Some(_) => None,
    }
}
