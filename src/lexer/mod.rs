//! # Lexer
//!
//! Turns NookScript source text into a flat list of classified [`Token`]s.
//!
//! Tokenization is longest-match: at every position each matcher in
//! [`matcher::MATCHERS`] is tried and the longest match wins. On equal length the
//! matcher registered later wins. Input no matcher accepts is consumed up to the next
//! whitespace character as a single [`Kind::Invalid`] token, so lexing always makes
//! progress and never fails; invalid tokens surface later as parse errors.
//!
//! Two modes exist. [`lex`] drops whitespace and comments, [`lex_verbose`] keeps them
//! so the host can syntax-highlight the exact input.

pub mod matcher;

use std::fmt;

use tracing::trace;

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    EOF,
    Identifier,
    Comment,
    Whitespace,

    // keywords and symbols
    Let,
    Fn,
    Impl,
    Plus,
    Minus,
    Divide,
    Multiply,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenSquare,
    CloseSquare,

    // type keywords
    IntType,
    FloatType,
    BoolType,
    StringType,
    PathType,
    FlagType,
    AtomType,
    CommandType,
    NoneType,

    // literals
    Int,
    Float,
    Bool,
    String,
    Path,
    Flag,
    Atom,
    Command,
}

impl Kind {
    /// Whitespace and comments are dropped by the normal lexer mode.
    pub fn is_ignored(self) -> bool {
        matches!(self, Kind::Whitespace | Kind::Comment)
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            Kind::IntType
                | Kind::FloatType
                | Kind::BoolType
                | Kind::StringType
                | Kind::PathType
                | Kind::FlagType
                | Kind::AtomType
                | Kind::CommandType
                | Kind::NoneType
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single token: its byte offset in the source, the raw text and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub position: usize,
    pub value: String,
    pub kind: Kind,
}

impl Token {
    pub fn new(position: usize, value: impl Into<String>, kind: Kind) -> Self {
        Self {
            position,
            value: value.into(),
            kind,
        }
    }

    /// The synthetic end-of-input token, placed just past the last real token.
    pub fn eof(position: usize) -> Self {
        Self::new(position, "", Kind::EOF)
    }

    /// Byte offset one past the last character of this token.
    pub fn end(&self) -> usize {
        self.position + self.value.len()
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self.kind {
            Kind::EOF => "end of input".to_string(),
            Kind::Identifier => format!("identifier '{}'", self.value),
            Kind::Int | Kind::Float => format!("number '{}'", self.value),
            Kind::String => format!("string {}", self.value),
            kind => format!("{} '{}'", kind, self.value),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    include_ignored: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            include_ignored: false,
        }
    }

    /// A lexer that keeps whitespace and comment tokens.
    pub fn verbose(source: &'a str) -> Self {
        Self {
            include_ignored: true,
            ..Self::new(source)
        }
    }

    /// Lex the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        let bytes = &self.source.as_bytes()[self.position..];
        if bytes.is_empty() {
            return None;
        }

        let found = matcher::longest_match(bytes);
        let start = self.position;
        self.position += found.len;

        Some(Token::new(
            start,
            &self.source[start..self.position],
            found.kind,
        ))
    }

    pub fn lex(mut self) -> Vec<Token> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token() {
            if token.kind.is_ignored() && !self.include_ignored {
                continue;
            }
            tokens.push(token);
        }

        trace!(count = tokens.len(), "lexed source");
        tokens
    }
}

/// Lex `source`, dropping whitespace and comments.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).lex()
}

/// Lex `source`, keeping whitespace and comments.
pub fn lex_verbose(source: &str) -> Vec<Token> {
    Lexer::verbose(source).lex()
}
