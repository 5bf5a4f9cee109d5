//! Codegen error types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The construct has no lowering in the selected backend.
    #[error("Unsupported by the {backend} backend: {construct}")]
    Unsupported {
        backend: &'static str,
        construct: String,
    },

    #[error("Number {0} does not fit the target's integer type")]
    NumberOutOfRange(String),
}

impl CodegenError {
    pub fn unsupported(backend: &'static str, construct: impl Into<String>) -> Self {
        CodegenError::Unsupported {
            backend,
            construct: construct.into(),
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;
