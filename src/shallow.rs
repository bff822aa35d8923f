// Shallow mode: a line filter for sources the tree builder should not touch
// (C++). Only directive lines are looked at; everything else is copied byte
// for byte.

use crate::rewrite::DirectiveFilter;

pub fn copy_shallow(source: &str, filter: &DirectiveFilter) -> String {
    if filter.is_empty() {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len());
    let mut lines = source.split_inclusive('\n');

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start_matches([' ', '\t']);
        let Some(directive) = trimmed.strip_prefix('#') else {
            out.push_str(line);
            continue;
        };

        // Directive text with its continuation lines, as the lexer sees it
        let mut raw = line.to_string();
        let mut text = strip_newline(directive).to_string();
        while text.trim_end_matches('\r').ends_with('\\') {
            let Some(next) = lines.next() else {
                break;
            };
            raw.push_str(next);
            text.push('\n');
            text.push_str(strip_newline(next));
        }

        if filter.should_delete(&text) {
            tracing::trace!(directive = %text, "dropping directive");
            out.push_str(&DirectiveFilter::blank_lines(&text));
        } else {
            out.push_str(&raw);
        }
    }
    out
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}
