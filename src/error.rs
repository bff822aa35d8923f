use thiserror::Error;

pub type Result<T> = core::result::Result<T, XfrmError>;

/// Lexer failures that stop the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("input too large: {size} bytes (max: {max} bytes)")]
    InputTooLarge { size: usize, max: usize },
    #[error("line {line}: token limit exceeded (max: {max} tokens)")]
    TooManyTokens { line: u32, max: usize },
    #[error("line {line}: brackets nested too deep (max: {max} levels)")]
    TooDeep { line: u32, max: usize },
}

/// Malformed control structures have no recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("line {line}: no parens for {construct}")]
    MissingCondition { construct: &'static str, line: u32 },
    #[error("line {line}: no end of {construct}")]
    MissingBody { construct: &'static str, line: u32 },
    #[error("line {line}: blocks nested too deep (max: {max} levels)")]
    TooDeep { line: u32, max: usize },
}

#[derive(Debug, Error)]
pub enum XfrmError {
    #[error("lex: {0}")]
    Lex(#[from] LexError),
    #[error("build: {0}")]
    Build(#[from] BuildError),
    #[error("config: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
