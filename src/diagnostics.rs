//! Collect-all error reporting for the structural phases.
//!
//! Lexing, parsing, normalizing and checking never stop at the first problem. Each of
//! them takes a `&mut Diagnostics` and keeps going, so one submission reports every
//! independent mistake at once. Evaluation is fail-fast and reports through
//! [`crate::interpreter::EvalError`] instead.

use std::fmt;

use lachs::Span;

use crate::normalize::NormalizeError;
use crate::parser::ParseError;
use crate::types::TypeError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Type(#[from] TypeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub error: DiagnosticError,
    /// Byte offset into the source the error points at.
    pub position: Option<usize>,
}

impl Diagnostic {
    /// Render the diagnostic with the offending source line underneath.
    pub fn render(&self, source: &str) -> String {
        let message = self.error.to_string();
        match self.position {
            Some(position) if position <= source.len() => {
                span_at(source, position).to_string(&message)
            }
            _ => message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{} (at byte {})", self.error, position),
            None => write!(f, "{}", self.error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<DiagnosticError>, position: Option<usize>) {
        self.items.push(Diagnostic {
            error: error.into(),
            position,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Every diagnostic rendered against `source`, one after the other.
    pub fn render(&self, source: &str) -> String {
        self.items
            .iter()
            .map(|diagnostic| diagnostic.render(source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, diagnostic) in self.items.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Zero-based line and column of a byte offset.
pub fn line_col(source: &str, position: usize) -> (usize, usize) {
    let before = &source.as_bytes()[..position.min(source.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count();
    let column = before.iter().rev().take_while(|&&b| b != b'\n').count();
    (line, column)
}

fn span_at(source: &str, position: usize) -> Span {
    let (line, column) = line_col(source, position);
    Span {
        start: (line, column),
        end: (line, column + 1),
        source: source.to_string(),
    }
}
