//! cx: a source-to-source transformer for C.
//!
//! Source text is tokenized into a flat sequence, nested into statements and
//! control structures, rewritten by a fixed set of local passes and emitted
//! again. See [`Transformer`] for the entry point.

pub mod ast;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod limits;
pub mod logging;
pub mod pipeline;
pub mod rewrite;
pub mod shallow;
pub mod syntax;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use emit::OutputFormat;
pub use error::{Result, XfrmError};
pub use pipeline::{TransformOptions, Transformed, Transformer};
