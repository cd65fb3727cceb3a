//! # Interpreter
//!
//! A tree-walking VM over the checked tree. Evaluation is fail-fast: the first error
//! is returned and nothing after it runs.
//!
//! The VM owns state that outlives a single evaluation: its runtime scope (grown by
//! top-level `let`s), the closures of evaluated `impl`s and its working directory. The working directory is
//! only ever read from the VM; the process's own current directory is never touched.

mod eval;
mod value;

pub use value::{CapturedEnv, Closure, Kind, Value};

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::ast::NodeId;
use crate::types::Env;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("'{op}' expects {expected} operands, found {found}")]
    OperandKind {
        op: &'static str,
        expected: Kind,
        found: Kind,
    },
    #[error("'{0}' needs at least one operand")]
    MissingOperands(&'static str),
    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expected {expected} argument(s), found {found}")]
    Arity { expected: usize, found: usize },
    #[error("'{}' could not be read: {source}", .path.display())]
    Directory { path: PathBuf, source: io::Error },
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to run '{program}': {source}")]
    Spawn { program: String, source: io::Error },
    #[error("value of kind {0} is not callable")]
    NotCallable(Kind),
    #[error("impl '{0}' was called before its declaration ran")]
    UndeclaredImpl(String),
    #[error("{0} cannot be evaluated")]
    Unsupported(&'static str),
}

pub struct Vm {
    working_dir: PathBuf,
    scope: Env<Value>,
    /// Closures of evaluated impl overloads, keyed by the declaring node.
    impls: HashMap<NodeId, Rc<Closure>>,
    last_status: Option<i32>,
}

impl Vm {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            scope: Env::new(),
            impls: HashMap::new(),
            last_status: None,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub(crate) fn set_working_dir(&mut self, dir: PathBuf) {
        self.working_dir = dir;
    }

    /// Exit code of the last external command. `None` before any command ran or when
    /// the last one was killed by a signal.
    pub fn last_status(&self) -> Option<i32> {
        self.last_status
    }

    /// A runtime binding, as seen from the current scope.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scope.resolve(name)
    }
}
