//! Error taxonomy shared across the front-end.
//!
//! Every diagnostic the lexer, macro expander, and parser raise carries a
//! [`Span`] into the source buffer it came from plus an [`ErrorKind`]
//! classifying it per the error taxonomy. Diagnostics are never fatal on
//! their own: callers accumulate them into a `Vec<SpannedError>` owned by
//! the `ParsedFile` and keep going.

use crate::span::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Preprocessor,
    Syntactic,
    NameResolution,
    Type,
    Structural,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Preprocessor => "preprocessor",
            ErrorKind::Syntactic => "syntax",
            ErrorKind::NameResolution => "name resolution",
            ErrorKind::Type => "type",
            ErrorKind::Structural => "structural",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct SpannedError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl SpannedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lexical, message, span)
    }

    pub fn preprocessor(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Preprocessor, message, span)
    }

    pub fn syntactic(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntactic, message, span)
    }

    pub fn name_resolution(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::NameResolution, message, span)
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Type, message, span)
    }

    pub fn structural(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Structural, message, span)
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}..{}",
            self.kind, self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for SpannedError {}

pub type Result<T> = std::result::Result<T, SpannedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_span() {
        let err = SpannedError::syntactic("expected ';'", Span::new(3, 4));
        let text = err.to_string();
        assert!(text.contains("syntax"));
        assert!(text.contains("expected ';'"));
        assert!(text.contains("3..4"));
    }

    #[test]
    fn constructors_set_expected_kind() {
        assert_eq!(SpannedError::lexical("x", Span::default()).kind, ErrorKind::Lexical);
        assert_eq!(SpannedError::preprocessor("x", Span::default()).kind, ErrorKind::Preprocessor);
        assert_eq!(SpannedError::type_error("x", Span::default()).kind, ErrorKind::Type);
        assert_eq!(SpannedError::structural("x", Span::default()).kind, ErrorKind::Structural);
        assert_eq!(SpannedError::name_resolution("x", Span::default()).kind, ErrorKind::NameResolution);
    }
}
