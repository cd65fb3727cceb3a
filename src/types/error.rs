//! # Type Error Definitions
//!
//! Errors reported by the checker. None of them stop checking: the offending node is
//! given the `none` type and inference carries on, so unrelated mistakes in the same
//! input are all reported together.

use crate::ast::TypeExpr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    /// A name that is not bound in any enclosing scope.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// Wrong number of arguments for a function value.
    #[error("expected {expected} argument(s), found {found}")]
    Arity { expected: usize, found: usize },

    /// An argument whose type does not match its parameter.
    #[error("argument {index} has type {found}, expected {expected}")]
    ArgumentType {
        index: usize,
        expected: TypeExpr,
        found: TypeExpr,
    },

    /// A function body that does not produce the declared return type.
    #[error("function body has type {found}, but the declared return type is {expected}")]
    ReturnType { expected: TypeExpr, found: TypeExpr },

    /// No overload of an impl or builtin accepts the arguments.
    #[error("no matching overload for '{name}' with arguments ({args})")]
    NoMatchingOverload { name: String, args: String },

    #[error("value of type {0} is not callable")]
    NotCallable(TypeExpr),

    /// Impl and builtin names only exist in call position.
    #[error("'{name}' is {kind} and cannot be used as a value")]
    NotAValue { name: String, kind: &'static str },

    /// A name bound to one kind of entry rebound to another in the same scope.
    #[error("'{name}' is already bound as {existing} in this scope and cannot be rebound as {new}")]
    KindConflict {
        name: String,
        existing: &'static str,
        new: &'static str,
    },

    #[error("{0} cannot be used as an expression")]
    InvalidExpression(&'static str),
}

impl TypeError {
    /// No-overload error listing the attempted argument types.
    pub fn no_matching_overload(name: impl Into<String>, args: &[TypeExpr]) -> Self {
        let args = args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        TypeError::NoMatchingOverload {
            name: name.into(),
            args,
        }
    }
}
