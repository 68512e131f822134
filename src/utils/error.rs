//! Error handling for the coolc frontend
//!
//! Lexing and parsing failures abort with an `Error`. Semantic findings are
//! not `Error`s; they accumulate in [`crate::semant::Diagnostics`] so a run
//! can report as many as possible before the driver gates the next phase.

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Frontend error
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("Expected an object identifier")]
    ExpectedIdent { span: Span },

    #[error("Expected a type identifier")]
    ExpectedType { span: Span },

    #[error("Expected an expression")]
    ExpectedExpr { span: Span },

    /// A malformed token the lexer flagged (unterminated string, EOF in
    /// comment, stray character)
    #[error("{message}")]
    Lexical { message: String, span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. } => Some(*span),
            Self::ExpectedIdent { span } => Some(*span),
            Self::ExpectedType { span } => Some(*span),
            Self::ExpectedExpr { span } => Some(*span),
            Self::Lexical { span, .. } => Some(*span),
        }
    }

    /// Source line of the error, when known
    pub fn line(&self) -> Option<u32> {
        self.span().map(|s| s.line)
    }
}
