//! # Parser
//!
//! Recursive descent over the token stream into the *raw* tree: every list becomes an
//! [`Expr::SExpr`](crate::ast::Expr::SExpr) and keywords in operator position become
//! marker nodes. The parser knows almost nothing about what forms mean; that is the
//! normalizer's job.
//!
//! Errors never abort the parse. Each one is pushed into the [`Diagnostics`] sink and the
//! malformed node is dropped, so sibling expressions are still parsed.

mod grammar;

pub use grammar::*;

use crate::diagnostics::Diagnostics;
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("() is not a valid s-expression")]
    EmptyList,
    #[error("unclosed expression list")]
    UnclosedList,
    #[error("invalid integer literal '{0}'")]
    InvalidInt(String),
    #[error("invalid float literal '{0}'")]
    InvalidFloat(String),
    #[error("invalid bool literal '{0}'")]
    InvalidBool(String),
    #[error("invalid token '{0}'")]
    InvalidToken(String),
    #[error("expected an expression, found {0}")]
    Expected(String),
    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

/// Token cursor with a single token of lookahead.
pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn advance(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Byte offset just past the last token, where the end of input sits.
    pub fn end_position(&self) -> usize {
        self.tokens.last().map(Token::end).unwrap_or(0)
    }
}

/// Parse exactly one expression from `tokens`. Empty input is an error.
pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Option<crate::ast::Expr> {
    let mut state = ParseState::new(tokens);
    if !state.has_next() {
        let eof = Token::eof(state.end_position());
        diagnostics.push(ParseError::Expected(eof.describe()), Some(eof.position));
        return None;
    }
    expression(&mut state, diagnostics)
}

/// Parse every top-level expression in `tokens`.
pub fn parse_program(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Vec<crate::ast::Expr> {
    let mut state = ParseState::new(tokens);
    let mut program = vec![];
    while state.has_next() {
        if let Some(expr) = expression(&mut state, diagnostics) {
            program.push(expr);
        }
    }

    tracing::debug!(
        expressions = program.len(),
        errors = diagnostics.len(),
        "parsed program"
    );
    program
}
