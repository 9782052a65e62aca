use std::fmt;

use crate::token::{Position, TokenKind};

/// A single parse problem. The parser accumulates these in insertion order
/// and never de-duplicates; rendering (file prefix, colors) is the host's
/// business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    pub(super) fn expected(position: Position, wanted: &[TokenKind], found: &TokenKind) -> Self {
        Self::new(
            position,
            format!("Expected {}, got '{found}'", describe(wanted)),
        )
    }

    pub(super) fn end_of_input(position: Position, wanted: &[TokenKind]) -> Self {
        Self::new(
            position,
            format!("Unexpected end of input: expected {}", describe(wanted)),
        )
    }
}

fn describe(wanted: &[TokenKind]) -> String {
    let parts: Vec<String> = wanted.iter().map(|kind| format!("'{kind}'")).collect();
    parts.join(" or ")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}
