use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PadError {
    /// Encoding was asked for a partial AST. Only complete programs have a
    /// list form.
    #[error("Cannot encode a partial program: {missing} is missing")]
    Incomplete { missing: &'static str },
    /// Encoding was asked for a construct the list form does not cover.
    #[error("{construct} has no programs-as-data form")]
    Unencodable { construct: &'static str },
    /// Decoding found a value of the wrong shape.
    #[error("Expected {expected}, found {found}")]
    Unexpected { expected: &'static str, found: String },
}
