//! # Types
//!
//! Static checking of the normalized tree:
//!
//! - [`ty`] - structural matching of [`TypeExpr`](crate::ast::TypeExpr)s, arity and variadics
//! - [`env`] - the chained environment shared with the interpreter
//! - [`symbol`] - value, impl and builtin entries on top of [`Env`]
//! - [`check`] - inference and overload resolution

pub mod check;
pub mod env;
pub mod error;
pub mod symbol;
pub mod ty;

pub use check::{CallTable, Checker};
pub use env::Env;
pub use error::TypeError;
pub use symbol::{Entry, Overload, SymbolTable, ValueEntry};
pub use ty::{matches, matches_arity, matches_func};
