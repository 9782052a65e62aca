use std::collections::VecDeque;

use crate::token::{Position, Token, TokenKind};

/// Queue view over the lexer's token stream.
pub(super) struct TokenCursor {
    tokens: VecDeque<Token>,
    last_pos: Position,
    last_width: usize,
}

impl TokenCursor {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            last_pos: Position::default(),
            last_width: 0,
        }
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub(super) fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.front().map(|token| &token.kind)
    }

    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front()?;
        self.last_pos = token.pos;
        self.last_width = token.kind.width();
        Some(token)
    }

    /// Position of the gap one column past the last consumed token, so
    /// end-of-input diagnostics point at where the missing piece would be.
    pub(super) fn end_position(&self) -> Position {
        Position::new(self.last_pos.row, self.last_pos.col + self.last_width)
    }

    /// Position for a diagnostic: the next token, or the gap at the end of
    /// the stream.
    pub(super) fn position(&self) -> Position {
        self.peek().map(|token| token.pos).unwrap_or_else(|| self.end_position())
    }

    /// Drops tokens until the next one is in `stops` or the stream is
    /// exhausted. The stop token itself is left for the caller.
    pub(super) fn consume_until(&mut self, stops: &[TokenKind]) {
        while let Some(token) = self.peek() {
            if stops.contains(&token.kind) {
                break;
            }
            self.advance();
        }
    }
}
