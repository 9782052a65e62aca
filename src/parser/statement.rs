//! Statement and block grammar, including the list-level error recovery.

use crate::token::TokenKind;

use super::ast::{Command, Expression, SwitchCase, SwitchDefault};
use super::error::Diagnostic;
use super::{ParseStatus, Parser};

const STATEMENT_EXPECTED: &str = "Expected if while or an assignment statement";

fn complete_expr(expr: &Option<Expression>) -> bool {
    matches!(expr, Some(expr) if expr.is_complete())
}

fn all_complete(commands: &[Command]) -> bool {
    commands.iter().all(Command::is_complete)
}

fn partial_switch(
    condition: Option<Expression>,
    cases: Vec<SwitchCase>,
    default: Option<SwitchDefault>,
) -> Command {
    Command::Switch {
        condition,
        cases,
        default: default.unwrap_or_else(SwitchDefault::empty),
        complete: false,
    }
}

impl Parser {
    /// Parses a `{ … }` block. Whatever statements were recognized are
    /// always returned; the status says whether the block itself was clean.
    pub(super) fn parse_block(&mut self) -> (ParseStatus, Vec<Command>) {
        let mut ok = true;
        match self.expect(&[TokenKind::LBrace]) {
            ParseStatus::Ok => {}
            ParseStatus::Error => ok = false,
            ParseStatus::Eoi => return (ParseStatus::Eoi, Vec::new()),
        }

        if matches!(self.cursor.peek_kind(), Some(TokenKind::RBrace)) {
            self.cursor.advance();
            let status = if ok { ParseStatus::Ok } else { ParseStatus::Error };
            return (status, Vec::new());
        }

        let (list_status, commands) = self.parse_statement_list(&[TokenKind::RBrace]);
        if list_status == ParseStatus::Eoi {
            return (ParseStatus::Eoi, commands);
        }

        match self.expect(&[TokenKind::RBrace]) {
            ParseStatus::Ok => {}
            ParseStatus::Error => ok = false,
            ParseStatus::Eoi => return (ParseStatus::Eoi, commands),
        }

        let status = if ok && list_status.is_ok() {
            ParseStatus::Ok
        } else {
            ParseStatus::Error
        };
        (status, commands)
    }

    /// Parses `;`-separated statements until the next token is one of
    /// `terminators` (left for the caller) or the stream ends. A failed
    /// statement drains to the next separator and the list carries on.
    fn parse_statement_list(&mut self, terminators: &[TokenKind]) -> (ParseStatus, Vec<Command>) {
        let mut commands = Vec::new();
        let mut ok = true;

        let mut separators = vec![TokenKind::Semicolon];
        separators.extend_from_slice(terminators);

        loop {
            match self.cursor.peek_kind() {
                None => {
                    self.report(Diagnostic::new(
                        self.cursor.end_position(),
                        "Unexpected end of input",
                    ));
                    return (ParseStatus::Eoi, commands);
                }
                Some(kind) if terminators.contains(kind) => break,
                Some(_) => {}
            }

            let (status, command) = self.parse_statement();
            if let Some(command) = command {
                commands.push(command);
            }
            match status {
                ParseStatus::Eoi => return (ParseStatus::Eoi, commands),
                ParseStatus::Error => {
                    ok = false;
                    self.cursor.consume_until(&separators);
                    if matches!(self.cursor.peek_kind(), Some(TokenKind::Semicolon)) {
                        self.cursor.advance();
                    }
                }
                ParseStatus::Ok => match self.cursor.peek_kind() {
                    Some(TokenKind::Semicolon) => {
                        self.cursor.advance();
                    }
                    Some(kind) if terminators.contains(kind) => break,
                    Some(_) => {
                        if let Some(token) = self.cursor.peek() {
                            let diagnostic =
                                Diagnostic::expected(token.pos, &separators, &token.kind);
                            self.report(diagnostic);
                        }
                        ok = false;
                        self.cursor.consume_until(&separators);
                        if matches!(self.cursor.peek_kind(), Some(TokenKind::Semicolon)) {
                            self.cursor.advance();
                        }
                    }
                    None => {
                        self.report(Diagnostic::end_of_input(
                            self.cursor.end_position(),
                            &separators,
                        ));
                        return (ParseStatus::Eoi, commands);
                    }
                },
            }
        }

        let status = if ok { ParseStatus::Ok } else { ParseStatus::Error };
        (status, commands)
    }

    fn parse_statement(&mut self) -> (ParseStatus, Option<Command>) {
        match self.cursor.peek_kind() {
            Some(TokenKind::If) => self.parse_cond(),
            Some(TokenKind::While) => self.parse_loop(),
            Some(TokenKind::Switch) => self.parse_switch(),
            Some(TokenKind::Identifier(_)) => self.parse_assignment(),
            Some(_) => {
                self.report(Diagnostic::new(self.cursor.position(), STATEMENT_EXPECTED));
                (ParseStatus::Error, None)
            }
            None => {
                self.report(Diagnostic::new(self.cursor.end_position(), STATEMENT_EXPECTED));
                (ParseStatus::Eoi, None)
            }
        }
    }

    /// `ident := E`. A missing `:=` is diagnosed but the right-hand side is
    /// still attempted.
    fn parse_assignment(&mut self) -> (ParseStatus, Option<Command>) {
        let Some(ident) = self.take_identifier() else {
            return (ParseStatus::Error, None);
        };

        let assign_status = self.expect(&[TokenKind::Assign]);
        if assign_status == ParseStatus::Eoi {
            let command = Command::Assign {
                ident,
                arg: None,
                complete: false,
            };
            return (ParseStatus::Eoi, Some(command));
        }

        let (expr_status, arg) = self.parse_expression();
        let complete = assign_status.is_ok()
            && expr_status.is_ok()
            && matches!(&arg, Some(expr) if expr.is_complete());
        let status = assign_status.merge(expr_status);
        (status, Some(Command::Assign { ident, arg, complete }))
    }

    /// `if E { … } [else { … }]`. A missing `else` is an empty alternative,
    /// not an error.
    fn parse_cond(&mut self) -> (ParseStatus, Option<Command>) {
        self.cursor.advance(); // `if`

        let (cond_status, condition) = self.parse_expression();
        if cond_status == ParseStatus::Eoi {
            let command = Command::Cond {
                condition,
                then_body: Vec::new(),
                else_body: Vec::new(),
                complete: false,
            };
            return (ParseStatus::Eoi, Some(command));
        }

        let (then_status, then_body) = self.parse_block();
        if then_status == ParseStatus::Eoi {
            let command = Command::Cond {
                condition,
                then_body,
                else_body: Vec::new(),
                complete: false,
            };
            return (ParseStatus::Eoi, Some(command));
        }

        let (else_status, else_body) = if matches!(self.cursor.peek_kind(), Some(TokenKind::Else))
        {
            self.cursor.advance();
            self.parse_block()
        } else {
            (ParseStatus::Ok, Vec::new())
        };
        if else_status == ParseStatus::Eoi {
            let command = Command::Cond {
                condition,
                then_body,
                else_body,
                complete: false,
            };
            return (ParseStatus::Eoi, Some(command));
        }

        let complete = cond_status.is_ok()
            && complete_expr(&condition)
            && then_status.is_ok()
            && else_status.is_ok()
            && all_complete(&then_body)
            && all_complete(&else_body);
        let command = Command::Cond {
            condition,
            then_body,
            else_body,
            complete,
        };
        (ParseStatus::Ok, Some(command))
    }

    /// `while E { … }`
    fn parse_loop(&mut self) -> (ParseStatus, Option<Command>) {
        self.cursor.advance(); // `while`

        let (cond_status, condition) = self.parse_expression();
        if cond_status == ParseStatus::Eoi {
            let command = Command::Loop {
                condition,
                body: Vec::new(),
                complete: false,
            };
            return (ParseStatus::Eoi, Some(command));
        }

        let (body_status, body) = self.parse_block();
        if body_status == ParseStatus::Eoi {
            let command = Command::Loop {
                condition,
                body,
                complete: false,
            };
            return (ParseStatus::Eoi, Some(command));
        }

        let complete = cond_status.is_ok()
            && complete_expr(&condition)
            && body_status.is_ok()
            && all_complete(&body);
        let command = Command::Loop {
            condition,
            body,
            complete,
        };
        (ParseStatus::Ok, Some(command))
    }

    /// `switch E { (case E: stmts)* (default: stmts)? }`, extended dialect.
    fn parse_switch(&mut self) -> (ParseStatus, Option<Command>) {
        let pos = self.cursor.position();
        self.cursor.advance(); // `switch`
        if self.pure_dialect_violation("Switch statements", pos) {
            return (ParseStatus::Error, None);
        }

        let (cond_status, condition) = self.parse_expression();
        if cond_status == ParseStatus::Eoi {
            return (
                ParseStatus::Eoi,
                Some(partial_switch(condition, Vec::new(), None)),
            );
        }
        let mut ok = cond_status.is_ok();

        match self.expect(&[TokenKind::LBrace]) {
            ParseStatus::Ok => {}
            ParseStatus::Error => ok = false,
            ParseStatus::Eoi => {
                return (
                    ParseStatus::Eoi,
                    Some(partial_switch(condition, Vec::new(), None)),
                );
            }
        }

        let mut cases: Vec<SwitchCase> = Vec::new();
        let mut default: Option<SwitchDefault> = None;
        let clause_heads = [TokenKind::Case, TokenKind::Default, TokenKind::RBrace];

        loop {
            match self.cursor.peek_kind() {
                Some(TokenKind::Case) => {
                    let clause_pos = self.cursor.position();
                    self.cursor.advance();
                    if default.is_some() {
                        self.report(Diagnostic::new(
                            clause_pos,
                            "The default clause must be the last clause of a switch",
                        ));
                        ok = false;
                    }
                    let (case_status, case) = self.parse_switch_case();
                    if let Some(case) = case {
                        cases.push(case);
                    }
                    match case_status {
                        ParseStatus::Ok => {}
                        ParseStatus::Error => ok = false,
                        ParseStatus::Eoi => {
                            return (ParseStatus::Eoi, Some(partial_switch(condition, cases, default)));
                        }
                    }
                }
                Some(TokenKind::Default) => {
                    let clause_pos = self.cursor.position();
                    self.cursor.advance();
                    if default.is_some() {
                        self.report(Diagnostic::new(
                            clause_pos,
                            "The default clause must be the last clause of a switch",
                        ));
                        ok = false;
                    }
                    let (default_status, clause) = self.parse_switch_default();
                    default = Some(clause);
                    match default_status {
                        ParseStatus::Ok => {}
                        ParseStatus::Error => ok = false,
                        ParseStatus::Eoi => {
                            return (ParseStatus::Eoi, Some(partial_switch(condition, cases, default)));
                        }
                    }
                }
                Some(TokenKind::RBrace) => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    if let Some(token) = self.cursor.peek() {
                        let diagnostic = Diagnostic::expected(token.pos, &clause_heads, &token.kind);
                        self.report(diagnostic);
                    }
                    ok = false;
                    self.cursor.consume_until(&clause_heads);
                }
                None => {
                    self.report(Diagnostic::end_of_input(
                        self.cursor.end_position(),
                        &clause_heads,
                    ));
                    return (ParseStatus::Eoi, Some(partial_switch(condition, cases, default)));
                }
            }
        }

        let default = default.unwrap_or_else(SwitchDefault::empty);
        let complete = ok
            && complete_expr(&condition)
            && cases.iter().all(|case| case.complete)
            && default.complete;
        let command = Command::Switch {
            condition,
            cases,
            default,
            complete,
        };
        (ParseStatus::Ok, Some(command))
    }

    fn parse_switch_case(&mut self) -> (ParseStatus, Option<SwitchCase>) {
        let (cond_status, condition) = self.parse_expression();
        if cond_status == ParseStatus::Eoi {
            let case = SwitchCase {
                condition,
                body: Vec::new(),
                complete: false,
            };
            return (ParseStatus::Eoi, Some(case));
        }

        let colon_status = self.expect(&[TokenKind::Colon]);
        if colon_status == ParseStatus::Eoi {
            let case = SwitchCase {
                condition,
                body: Vec::new(),
                complete: false,
            };
            return (ParseStatus::Eoi, Some(case));
        }

        let (body_status, body) = self.parse_statement_list(&[
            TokenKind::Case,
            TokenKind::Default,
            TokenKind::RBrace,
        ]);

        let complete = cond_status.is_ok()
            && colon_status.is_ok()
            && body_status.is_ok()
            && complete_expr(&condition)
            && all_complete(&body);
        let status = if body_status == ParseStatus::Eoi {
            ParseStatus::Eoi
        } else {
            ParseStatus::Ok
        };
        (status, Some(SwitchCase { condition, body, complete }))
    }

    fn parse_switch_default(&mut self) -> (ParseStatus, SwitchDefault) {
        let colon_status = self.expect(&[TokenKind::Colon]);
        if colon_status == ParseStatus::Eoi {
            let clause = SwitchDefault {
                body: Vec::new(),
                complete: false,
            };
            return (ParseStatus::Eoi, clause);
        }

        let (body_status, body) = self.parse_statement_list(&[
            TokenKind::Case,
            TokenKind::Default,
            TokenKind::RBrace,
        ]);

        let complete = colon_status.is_ok() && body_status.is_ok() && all_complete(&body);
        let status = if body_status == ParseStatus::Eoi {
            ParseStatus::Eoi
        } else {
            ParseStatus::Ok
        };
        (status, SwitchDefault { body, complete })
    }
}
