// Pipeline - lex, build, rewrite and emit one document
//
// A Transformer owns the tables shared by every run: the keyword table and
// the directive filter. Each run gets its own arena and diagnostics.

use crate::builder;
use crate::config::{Config, TransformSettings};
use crate::diagnostics::Diagnostics;
use crate::emit::{self, OutputFormat};
use crate::error::{LexError, Result};
use crate::lexer;
use crate::limits::TransformLimits;
use crate::rewrite::{self, DirectiveFilter, RewriteOptions};
use crate::shallow;
use crate::syntax::KeywordTable;

#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub limits: TransformLimits,
    pub settings: TransformSettings,
    pub format: OutputFormat,
}

impl From<Config> for TransformOptions {
    fn from(config: Config) -> Self {
        Self {
            limits: config.limits,
            settings: config.transform,
            format: OutputFormat::Source,
        }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Transformed {
    pub output: String,
    pub diagnostics: Diagnostics,
}

pub struct Transformer {
    keywords: KeywordTable,
    directives: DirectiveFilter,
    options: TransformOptions,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Self {
            keywords: KeywordTable::new(),
            directives: DirectiveFilter::from_settings(&options.settings),
            options,
        }
    }

    pub fn run(&self, source: &str) -> Result<Transformed> {
        let mut diagnostics = Diagnostics::new();
        let limits = &self.options.limits;

        let ast = lexer::lex(source, &self.keywords, limits, &mut diagnostics)?;
        let ast = builder::build(ast, limits)?;

        let options = RewriteOptions {
            directives: &self.directives,
            hoist_for_decls: self.options.settings.hoist_for_decls,
            strip_line_comments: self.options.settings.strip_line_comments,
        };
        let mut ast = rewrite::rewrite(ast, &options, &mut diagnostics);

        let output = emit::emit(&ast, self.options.format);
        tracing::info!(
            bytes_in = source.len(),
            bytes_out = output.len(),
            nodes = ast.live_count(),
            diagnostics = diagnostics.len(),
            "transformed"
        );
        ast.clear();

        Ok(Transformed {
            output,
            diagnostics,
        })
    }

    /// Directive-only line filter; the source is never tokenized.
    pub fn run_shallow(&self, source: &str) -> Result<Transformed> {
        let max = self.options.limits.max_input_size;
        if source.len() > max {
            return Err(LexError::InputTooLarge {
                size: source.len(),
                max,
            }
            .into());
        }

        let output = shallow::copy_shallow(source, &self.directives);
        tracing::info!(bytes_in = source.len(), bytes_out = output.len(), "copied shallow");
        Ok(Transformed {
            output,
            diagnostics: Diagnostics::new(),
        })
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::error::{BuildError, XfrmError};

    #[test]
    fn test_round_trip_without_rewrites() {
        let transformer = Transformer::default();
        let source = "int main(int argc, char **argv) {\n  if (argc > 1) return 1;\n  return 0;\n}\n";
        let result = transformer.run(source).unwrap();
        assert_eq!(result.output, source);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_fatal_build_error() {
        let err = Transformer::default().run("void f() { if x; }").unwrap_err();
        assert!(matches!(
            err,
            XfrmError::Build(BuildError::MissingCondition { .. })
        ));
    }

    #[test]
    fn test_diagnostics_are_returned() {
        let result = Transformer::default().run("f(x;\n").unwrap();
        assert_eq!(result.diagnostics.count(DiagnosticKind::UnclosedGroup), 1);

        let result = Transformer::default().run("for (a b; n) x;").unwrap();
        assert_eq!(result.diagnostics.count(DiagnosticKind::AmbiguousQuickFor), 1);
    }

    #[test]
    fn test_settings_flow_into_passes() {
        let options = TransformOptions {
            settings: TransformSettings {
                no_pragmas: vec!["omp".to_string()],
                hoist_for_decls: false,
                strip_line_comments: false,
                ..TransformSettings::default()
            },
            ..TransformOptions::default()
        };
        let transformer = Transformer::new(options);
        let result = transformer
            .run("#pragma omp simd\nfor (i; n) a[i] = 0; // zero\n")
            .unwrap();
        assert_eq!(
            result.output,
            "\nfor (unsigned int i = 0; i < n; ++i) a[i] = 0; // zero\n"
        );
    }

    #[test]
    fn test_sexp_format() {
        let options = TransformOptions {
            format: OutputFormat::Sexp,
            ..TransformOptions::default()
        };
        let result = Transformer::new(options).run("x;").unwrap();
        assert_eq!(result.output, "10:(1)\n");
    }

    #[test]
    fn test_input_limit() {
        let options = TransformOptions {
            limits: TransformLimits {
                max_input_size: 4,
                ..TransformLimits::default()
            },
            ..TransformOptions::default()
        };
        let transformer = Transformer::new(options);
        assert!(matches!(
            transformer.run("int x;"),
            Err(XfrmError::Lex(LexError::InputTooLarge { size: 6, max: 4 }))
        ));
        assert!(transformer.run_shallow("int x;").is_err());
    }

    #[test]
    fn test_shallow_run() {
        let options = TransformOptions {
            settings: TransformSettings {
                no_pragmas: vec!["omp".to_string()],
                ..TransformSettings::default()
            },
            ..TransformOptions::default()
        };
        let result = Transformer::new(options)
            .run_shallow("#pragma omp for\nfor (auto &x : v) {}\n")
            .unwrap();
        assert_eq!(result.output, "\nfor (auto &x : v) {}\n");
    }

    #[test]
    fn test_rejected_quick_for_is_left_alone() {
        for source in ["for (i, j; n) x;", "for (a b; n) x;"] {
            let result = Transformer::default().run(source).unwrap();
            assert_eq!(result.output, source);
            assert_eq!(result.diagnostics.len(), 1);
            assert_eq!(result.diagnostics.count(DiagnosticKind::AmbiguousQuickFor), 1);
        }
    }
}
