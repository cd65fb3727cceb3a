//! The host-facing pipeline.
//!
//! A [`Session`] is one long-lived interpreter: definitions from earlier submissions
//! stay visible to later ones, in the checker as well as in the VM.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::ast::{Expr, TypeExpr};
use crate::diagnostics::Diagnostics;
use crate::interpreter::{EvalError, Value, Vm};
use crate::lexer::{self, Kind};
use crate::normalize::Normalizer;
use crate::parser;
use crate::types::{CallTable, Checker};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every problem found while parsing, normalizing or checking.
    #[error(transparent)]
    Diagnostics(Diagnostics),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub struct Session {
    normalizer: Normalizer,
    checker: Checker,
    calls: Rc<CallTable>,
    vm: Vm,
    last_type: Option<TypeExpr>,
}

impl Session {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            normalizer: Normalizer::new(),
            checker: Checker::new(),
            calls: Rc::new(CallTable::new()),
            vm: Vm::new(working_dir),
            last_type: None,
        }
    }

    pub fn working_dir(&self) -> &Path {
        self.vm.working_dir()
    }

    pub fn last_status(&self) -> Option<i32> {
        self.vm.last_status()
    }

    /// Static type of the last expression of the last successful submission.
    pub fn last_type(&self) -> Option<&TypeExpr> {
        self.last_type.as_ref()
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    /// Lex, parse and normalize `source` without checking or running it.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Expr>, Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        let raw = parser::parse_program(lexer::lex(source), &mut diagnostics);
        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        let program = self.normalizer.normalize_program(raw, &mut diagnostics);
        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }
        Ok(program)
    }

    /// Run every expression in `source` and return the value of the last one.
    ///
    /// The whole submission is checked before anything runs, and all of its diagnostics
    /// come back together. Expressions then run one at a time. When one fails at
    /// runtime, the checker forgets what that expression declared, so it never knows a
    /// binding the VM does not hold.
    pub fn run(&mut self, source: &str) -> Result<Value, Error> {
        let program = self.parse(source).map_err(Error::Diagnostics)?;

        let mut diagnostics = Diagnostics::new();
        self.checker.clone().infer_program(&program, &mut diagnostics);
        if !diagnostics.is_empty() {
            return Err(Error::Diagnostics(diagnostics));
        }

        self.last_type = None;
        let mut last = Value::None;
        for expr in &program {
            last = self.step(expr)?;
        }
        debug!(kind = %last.kind(), "evaluated submission");
        Ok(last)
    }

    fn step(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        let checkpoint = self.checker.clone();
        // Already checked as part of the submission, so this reports nothing new.
        let ty = self.checker.infer(expr, &mut Diagnostics::new());
        Rc::make_mut(&mut self.calls).extend(self.checker.take_calls());

        match self.vm.eval(expr, &self.calls) {
            Ok(value) => {
                self.last_type = Some(ty);
                Ok(value)
            }
            Err(error) => {
                self.checker = checkpoint;
                Err(error)
            }
        }
    }
}

/// Whether `source` has balanced brackets (ignoring comments and strings) and holds
/// something besides comments and whitespace.
pub fn is_complete_expression(source: &str) -> bool {
    let mut depth = 0i64;
    let mut has_content = false;

    for token in lexer::lex_verbose(source) {
        match token.kind {
            Kind::OpenParen | Kind::OpenSquare | Kind::OpenCurly => depth += 1,
            Kind::CloseParen | Kind::CloseSquare | Kind::CloseCurly => depth -= 1,
            _ => {}
        }
        if !token.kind.is_ignored() {
            has_content = true;
        }
    }

    depth <= 0 && has_content
}

/// Whether `source` holds comments and nothing else.
pub fn is_just_comment(source: &str) -> bool {
    let tokens = lexer::lex_verbose(source);
    tokens.iter().any(|token| token.kind == Kind::Comment)
        && tokens.iter().all(|token| token.kind.is_ignored())
}
