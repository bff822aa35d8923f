// Transformer safety limits
//
// Bounds the work a single document can cause:
// - deep bracket nesting (recursion in the builder)
// - very large inputs
// - token floods from pathological input
//
// Defaults are permissive and can be overridden via the [limits] table of cx.toml

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformLimits {
    pub max_input_size: usize,    // Maximum source size in bytes
    pub max_token_count: usize,   // Maximum nodes produced by the lexer
    pub max_nesting_depth: usize, // Maximum bracket / block nesting
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000, // 10 MB
            max_token_count: 2_000_000,
            max_nesting_depth: 256,
        }
    }
}

impl TransformLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that all limits are positive and not absurdly large
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_REASONABLE: usize = 100_000_000; // 100 MB

        if self.max_input_size == 0 || self.max_input_size > MAX_REASONABLE {
            return Err(ConfigError::invalid_limit("max_input_size", self.max_input_size));
        }

        if self.max_token_count == 0 || self.max_token_count > MAX_REASONABLE {
            return Err(ConfigError::invalid_limit("max_token_count", self.max_token_count));
        }

        if self.max_nesting_depth == 0 || self.max_nesting_depth > 10_000 {
            return Err(ConfigError::invalid_limit(
                "max_nesting_depth",
                self.max_nesting_depth,
            ));
        }

        Ok(())
    }
}
