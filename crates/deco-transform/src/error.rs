//! Transform error types

use deco_ast::Span;
use std::fmt;

/// Transform error kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TransformErrorKind {
    /// Decorator placement the rewrite does not support.
    NotImplemented(&'static str),

    /// Both halves of a coalesced get/set pair carry decorators.
    AccessorPairDecorated,
}

/// Transform error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct TransformError {
    pub kind: TransformErrorKind,
    pub span: Span,
}

impl TransformError {
    pub fn new(kind: TransformErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            TransformErrorKind::NotImplemented(_) => "E0001",
            TransformErrorKind::AccessorPairDecorated => "E0002",
        }
    }
}

impl fmt::Display for TransformErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformErrorKind::NotImplemented(what) => {
                write!(f, "{} are not implemented", what)
            }
            TransformErrorKind::AccessorPairDecorated => {
                write!(f, "Cannot decorate both getter and setter for the same property")
            }
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transform error at {}..{}: {}",
            self.span.start, self.span.end, self.kind
        )
    }
}

impl std::error::Error for TransformError {}
