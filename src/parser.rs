//! Recovering recursive-descent parser for WHILE token streams.
//!
//! The parser never fails outright: it records diagnostics, repairs what it
//! can, and always returns a program AST. Nodes the recovery could not fully
//! rebuild carry `complete == false`, so `program.complete` is true exactly
//! when the diagnostic list is empty.

pub mod ast;
mod cursor;
mod error;
mod expression;
mod statement;

pub use error::Diagnostic;

use crate::token::{Position, Token, TokenKind};
use ast::{Command, Ident, Program};
use cursor::TokenCursor;

/// Parser configuration. `pure_only` rejects the extended dialect (numeric
/// literals and `switch` statements).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub pure_only: bool,
}

/// Outcome of a structured parse step. `Error` means diagnostics were
/// recorded but parsing can continue after local recovery; `Eoi` terminates
/// every enclosing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseStatus {
    Ok,
    Error,
    Eoi,
}

impl ParseStatus {
    fn is_ok(self) -> bool {
        self == ParseStatus::Ok
    }

    /// The more severe of two outcomes; `Eoi` outranks `Error`.
    fn merge(self, other: ParseStatus) -> ParseStatus {
        match (self, other) {
            (ParseStatus::Eoi, _) | (_, ParseStatus::Eoi) => ParseStatus::Eoi,
            (ParseStatus::Error, _) | (_, ParseStatus::Error) => ParseStatus::Error,
            _ => ParseStatus::Ok,
        }
    }
}

struct Parser {
    cursor: TokenCursor,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
}

/// Parses a full token stream. Always returns a program, possibly partial,
/// together with every diagnostic in insertion order.
pub fn parse_tokens(tokens: Vec<Token>, options: ParseOptions) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens, options);
    let program = parser.parse_program();
    (program, parser.diagnostics)
}

impl Parser {
    fn new(tokens: Vec<Token>, options: ParseOptions) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            diagnostics: Vec::new(),
            options,
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Consumes the next token and validates it against `wanted`. A
    /// mismatching token is consumed and diagnosed; end of input is
    /// diagnosed at the gap past the last token.
    fn expect(&mut self, wanted: &[TokenKind]) -> ParseStatus {
        match self.cursor.peek() {
            Some(token) if wanted.contains(&token.kind) => {
                self.cursor.advance();
                ParseStatus::Ok
            }
            Some(token) => {
                let diagnostic = Diagnostic::expected(token.pos, wanted, &token.kind);
                self.report(diagnostic);
                self.cursor.advance();
                ParseStatus::Error
            }
            None => {
                let diagnostic = Diagnostic::end_of_input(self.cursor.end_position(), wanted);
                self.report(diagnostic);
                ParseStatus::Eoi
            }
        }
    }

    /// Consumes an identifier token if one is next.
    fn take_identifier(&mut self) -> Option<Ident> {
        if !matches!(self.cursor.peek_kind(), Some(TokenKind::Identifier(_))) {
            return None;
        }
        let token = self.cursor.advance()?;
        match token.kind {
            TokenKind::Identifier(name) => Some(Ident::new(name, token.pos)),
            _ => None,
        }
    }

    /// Single gate for the extended dialect. Reports and returns true when
    /// `construct` is not available under `pure_only`.
    fn pure_dialect_violation(&mut self, construct: &str, pos: Position) -> bool {
        if !self.options.pure_only {
            return false;
        }
        self.report(Diagnostic::new(
            pos,
            format!("{construct} are not allowed in the pure dialect"),
        ));
        true
    }

    /// `name read input { body } write output`
    fn parse_program(&mut self) -> Program {
        let (intro_ok, name, input) = self.parse_intro();
        let (body_status, body) = self.parse_block();

        let (outro_ok, output) = if body_status == ParseStatus::Eoi {
            (false, None)
        } else {
            self.parse_outro()
        };

        let complete = intro_ok
            && outro_ok
            && body_status.is_ok()
            && name.is_some()
            && input.is_some()
            && output.is_some()
            && body.iter().all(Command::is_complete);

        Program {
            name,
            input,
            output,
            body,
            complete,
        }
    }

    /// The `name read input` opening, with targeted recovery for the common
    /// degraded shapes: no name, no `read`, or the body starting straight
    /// away.
    fn parse_intro(&mut self) -> (bool, Option<Ident>, Option<Ident>) {
        let mut ok = true;

        let name = match self.cursor.peek_kind() {
            Some(TokenKind::Identifier(_)) => self.take_identifier(),
            Some(TokenKind::Read) => {
                self.report(Diagnostic::new(self.cursor.position(), "Missing program name"));
                ok = false;
                None
            }
            Some(TokenKind::LBrace) => {
                let pos = self.cursor.position();
                self.report(Diagnostic::new(pos, "Missing program name"));
                self.report(Diagnostic::new(pos, "Missing input variable"));
                return (false, None, None);
            }
            Some(_) => {
                if let Some(token) = self.cursor.advance() {
                    self.report(Diagnostic::new(
                        token.pos,
                        format!("Expected a program name, got '{}'", token.kind),
                    ));
                }
                ok = false;
                None
            }
            None => {
                self.report(Diagnostic::new(self.cursor.end_position(), "Missing program name"));
                return (false, None, None);
            }
        };

        match self.cursor.peek_kind() {
            Some(TokenKind::Read) => {
                self.cursor.advance();
            }
            _ => {
                self.report(Diagnostic::new(self.cursor.position(), "Missing 'read' keyword"));
                ok = false;
            }
        }

        let input = match self.cursor.peek_kind() {
            Some(TokenKind::Identifier(_)) => self.take_identifier(),
            _ => {
                self.report(Diagnostic::new(self.cursor.position(), "Missing input variable"));
                ok = false;
                None
            }
        };

        (ok, name, input)
    }

    /// The `write output` closing. An identifier standing alone is accepted
    /// as the output with the keyword reported missing; anything left after
    /// the output is diagnosed without failing the parse.
    fn parse_outro(&mut self) -> (bool, Option<Ident>) {
        let mut ok = true;

        match self.cursor.peek_kind() {
            Some(TokenKind::Write) => {
                self.cursor.advance();
            }
            Some(TokenKind::Identifier(_)) => {
                self.report(Diagnostic::new(self.cursor.position(), "Missing 'write' keyword"));
                ok = false;
            }
            Some(_) => {
                self.expect(&[TokenKind::Write]);
                ok = false;
            }
            None => {
                self.report(Diagnostic::end_of_input(
                    self.cursor.end_position(),
                    &[TokenKind::Write],
                ));
                return (false, None);
            }
        }

        let output = match self.cursor.peek_kind() {
            Some(TokenKind::Identifier(_)) => self.take_identifier(),
            _ => {
                self.report(Diagnostic::new(self.cursor.position(), "Missing output variable"));
                ok = false;
                None
            }
        };

        if let Some(token) = self.cursor.peek() {
            self.report(Diagnostic::new(token.pos, "Expected end of input"));
            ok = false;
        }

        (ok, output)
    }
}
