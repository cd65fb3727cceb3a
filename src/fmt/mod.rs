//! Pretty printing
//!
//! `Display` for the tree, types and runtime values. Expressions print back as
//! single-line s-expressions, types in the `fn(int int) int` notation used by error
//! messages.

mod expr;
mod types;
