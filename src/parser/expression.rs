//! Expression grammar: `E ::= ident | '(' E ')' | hd E | tl E | cons E E |
//! number`, numbers being extended-dialect only.

use crate::token::{Op, TokenKind};
use crate::tree::Tree;

use super::ast::Expression;
use super::error::Diagnostic;
use super::{ParseStatus, Parser};

const EXPRESSION_EXPECTED: &str = "Expected an expression or an identifier";

impl Parser {
    /// Parses one expression. On `Error` diagnostics were recorded; a
    /// partially built node may still come back with it, and the offending
    /// token is left for statement-level recovery.
    pub(super) fn parse_expression(&mut self) -> (ParseStatus, Option<Expression>) {
        match self.cursor.peek_kind() {
            Some(TokenKind::Identifier(_)) => {
                let ident = self.take_identifier();
                (ParseStatus::Ok, ident.map(Expression::Identifier))
            }
            Some(TokenKind::Number(value)) => {
                let value = *value;
                let pos = self.cursor.position();
                self.cursor.advance();
                if self.pure_dialect_violation("Numeric literals", pos) {
                    (ParseStatus::Error, None)
                } else {
                    let literal = Expression::TreeLiteral {
                        tree: Tree::from_nat(value),
                    };
                    (ParseStatus::Ok, Some(literal))
                }
            }
            Some(TokenKind::Op(op)) => {
                let op = *op;
                self.cursor.advance();
                self.parse_operation(op)
            }
            Some(TokenKind::LParen) => {
                self.cursor.advance();
                let (mut status, inner) = self.parse_expression();
                if status == ParseStatus::Eoi {
                    return (status, inner);
                }
                match self.cursor.peek_kind() {
                    Some(TokenKind::RParen) => {
                        self.cursor.advance();
                    }
                    _ => {
                        // grouping only: keep the inner expression and leave
                        // the unexpected token in place
                        self.report(Diagnostic::new(self.cursor.position(), "Expected ')'"));
                        status = ParseStatus::Error;
                    }
                }
                (status, inner)
            }
            Some(_) => {
                self.report(Diagnostic::new(self.cursor.position(), EXPRESSION_EXPECTED));
                (ParseStatus::Error, None)
            }
            None => {
                self.report(Diagnostic::new(self.cursor.end_position(), EXPRESSION_EXPECTED));
                (ParseStatus::Eoi, None)
            }
        }
    }

    /// Reads the arguments of `op`, which has already been consumed. A
    /// broken child stops the argument scan; remaining slots stay empty.
    fn parse_operation(&mut self, op: Op) -> (ParseStatus, Option<Expression>) {
        let mut args = Vec::with_capacity(op.arity());
        let mut status = ParseStatus::Ok;
        for _ in 0..op.arity() {
            if status != ParseStatus::Ok {
                args.push(None);
                continue;
            }
            let (child_status, child) = self.parse_expression();
            if child_status != ParseStatus::Ok {
                status = child_status;
            }
            args.push(child);
        }

        let complete = status.is_ok()
            && args
                .iter()
                .all(|arg| matches!(arg, Some(expr) if expr.is_complete()));
        (status, Some(Expression::Operation { op, args, complete }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;
    use crate::parser::ast::Ident;
    use crate::token::{Position, Token};

    fn parser(tokens: Vec<Token>) -> Parser {
        Parser::new(tokens, ParseOptions::default())
    }

    fn pure_parser(tokens: Vec<Token>) -> Parser {
        Parser::new(tokens, ParseOptions { pure_only: true })
    }

    fn tok(kind: TokenKind) -> Token {
        Token::new(kind, Position::default())
    }

    fn ident_tok(name: &str) -> Token {
        tok(TokenKind::Identifier(name.to_string()))
    }

    fn ident_expr(name: &str) -> Expression {
        Expression::Identifier(Ident::new(name, Position::default()))
    }

    #[test]
    fn parses_nested_cons() {
        let mut parser = parser(vec![
            tok(TokenKind::Op(Op::Cons)),
            ident_tok("X"),
            tok(TokenKind::Op(Op::Hd)),
            ident_tok("Y"),
        ]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Ok);
        let expected = Expression::Operation {
            op: Op::Cons,
            args: vec![
                Some(ident_expr("X")),
                Some(Expression::Operation {
                    op: Op::Hd,
                    args: vec![Some(ident_expr("Y"))],
                    complete: true,
                }),
            ],
            complete: true,
        };
        assert_eq!(expr, Some(expected));
        assert!(parser.diagnostics.is_empty());
    }

    #[test]
    fn parentheses_group_without_a_node() {
        let mut parser = parser(vec![
            tok(TokenKind::LParen),
            ident_tok("X"),
            tok(TokenKind::RParen),
        ]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Ok);
        assert_eq!(expr, Some(ident_expr("X")));
    }

    #[test]
    fn missing_close_paren_keeps_the_inner_expression() {
        let mut parser = parser(vec![
            tok(TokenKind::LParen),
            ident_tok("X"),
            tok(TokenKind::Semicolon),
        ]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Error);
        assert_eq!(expr, Some(ident_expr("X")));
        assert_eq!(parser.diagnostics.len(), 1);
        assert_eq!(parser.diagnostics[0].message, "Expected ')'");
        // the stray token is the caller's to recover past
        assert_eq!(parser.cursor.peek_kind(), Some(&TokenKind::Semicolon));
    }

    #[test]
    fn numeric_literal_becomes_a_tree() {
        let mut parser = parser(vec![tok(TokenKind::Number(3))]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Ok);
        assert_eq!(
            expr,
            Some(Expression::TreeLiteral {
                tree: Tree::from_nat(3)
            })
        );
    }

    #[test]
    fn numeric_literal_rejected_in_pure_dialect() {
        let mut parser = pure_parser(vec![tok(TokenKind::Number(3))]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Error);
        assert_eq!(expr, None);
        assert_eq!(parser.diagnostics.len(), 1);
        assert!(parser.diagnostics[0].message.contains("pure dialect"));
    }

    #[test]
    fn bad_leading_token_yields_no_node() {
        let mut parser = parser(vec![tok(TokenKind::Semicolon)]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Error);
        assert_eq!(expr, None);
        assert_eq!(parser.diagnostics[0].message, EXPRESSION_EXPECTED);
        // not consumed
        assert_eq!(parser.cursor.peek_kind(), Some(&TokenKind::Semicolon));
    }

    #[test]
    fn missing_argument_marks_the_operation_partial() {
        let mut parser = parser(vec![tok(TokenKind::Op(Op::Cons)), ident_tok("X")]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Eoi);
        assert_eq!(
            expr,
            Some(Expression::Operation {
                op: Op::Cons,
                args: vec![Some(ident_expr("X")), None],
                complete: false,
            })
        );
        assert_eq!(parser.diagnostics.len(), 1);
    }

    #[test]
    fn broken_first_argument_stops_the_scan() {
        let mut parser = parser(vec![
            tok(TokenKind::Op(Op::Cons)),
            tok(TokenKind::Semicolon),
            ident_tok("X"),
        ]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Error);
        assert_eq!(
            expr,
            Some(Expression::Operation {
                op: Op::Cons,
                args: vec![None, None],
                complete: false,
            })
        );
        // recovery resumes at the separator, not past it
        assert_eq!(parser.cursor.peek_kind(), Some(&TokenKind::Semicolon));
    }

    #[test]
    fn partial_child_poisons_completeness() {
        // cons (hd) X  -- the inner hd has no argument
        let mut parser = parser(vec![
            tok(TokenKind::Op(Op::Cons)),
            tok(TokenKind::LParen),
            tok(TokenKind::Op(Op::Hd)),
            tok(TokenKind::RParen),
            ident_tok("X"),
        ]);
        let (status, expr) = parser.parse_expression();

        assert_eq!(status, ParseStatus::Error);
        let Some(Expression::Operation { complete, .. }) = expr else {
            panic!("expected an operation node");
        };
        assert!(!complete);
    }
}
