//! # Abstract Syntax Tree
//!
//! Two closed families of nodes flow through the pipeline:
//!
//! - [`Expr`]: every expression form. The raw shapes (`SExpr` and the `S*` operator
//!   markers) are produced by the parser and only live until normalization; the
//!   semantic shapes (`Let`, `Func`, `Impl`, `Command`, `Call`, ...) are produced by the
//!   normalizer and consumed by the checker and the interpreter.
//! - [`TypeExpr`]: the static types the checker reasons about.
//!
//! Nodes are immutable once built. Call resolution is recorded by the checker in a
//! side table keyed by [`NodeId`] rather than written back into the tree.

pub mod expression;
pub mod types;

pub use expression::*;
pub use types::*;

/// Stable identity of a [`Call`] or [`Impl`] node, unique per
/// [`crate::normalize::Normalizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
