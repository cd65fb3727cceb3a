use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Func;
use crate::types::CallTable;

/// The bindings visible where a function literal was evaluated
#[derive(Debug, Clone, Default)]
pub struct CapturedEnv(pub HashMap<String, Value>);

/// A function value. Calls inside `func` are resolved through `calls`, the table the
/// function was checked against.
#[derive(Debug)]
pub struct Closure {
    pub func: Func,
    pub captured: CapturedEnv,
    pub calls: Rc<CallTable>,
}

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Raw atom text, sigil included.
    Atom(String),
    String(String),
    Path(String),
    Flag(String),
    /// Produced by forms that have no value, like `let`.
    None,
    Func(Rc<Closure>),
}

/// The tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Float,
    Bool,
    Atom,
    String,
    Path,
    Flag,
    None,
    Func,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Atom(_) => Kind::Atom,
            Value::String(_) => Kind::String,
            Value::Path(_) => Kind::Path,
            Value::Flag(_) => Kind::Flag,
            Value::None => Kind::None,
            Value::Func(_) => Kind::Func,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The value as a command-line argument. Atoms lose their sigil.
    pub fn to_arg(&self) -> String {
        match self {
            Value::Atom(atom) => atom.trim_start_matches('\'').to_string(),
            other => other.to_string(),
        }
    }
}

// Closures are equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Atom(a), Value::Atom(b))
            | (Value::String(a), Value::String(b))
            | (Value::Path(a), Value::Path(b))
            | (Value::Flag(a), Value::Flag(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Func(a), Value::Func(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Atom => "atom",
            Kind::String => "str",
            Kind::Path => "path",
            Kind::Flag => "flag",
            Kind::None => "none",
            Kind::Func => "fn",
        };
        f.write_str(name)
    }
}
