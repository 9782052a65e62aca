use thiserror::Error;

/// Typed errors produced by the interpreter.
///
/// These indicate caller contract violations (running an AST the parser
/// flagged incomplete, or one assembled by hand with empty slots), never
/// user-program failures: `hd`/`tl` of `nil` are values, and a well-formed
/// program can only ever diverge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("Malformed program: {reason}")]
    MalformedAst { reason: &'static str },
}
