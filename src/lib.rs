//! # Nook - an s-expression scripting language for a shell notebook
//!
//! NookScript is a small, statically checked language whose programs are
//! s-expressions. It can do arithmetic, define and call functions, overload them, and
//! shell out to external programs relative to its own working directory.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (&str)
//!     ↓
//! [Lexer] → Vec<Token>                 longest-match tokenization
//!     ↓
//! [Parser] → raw Expr tree            lists plus operator markers
//!     ↓
//! [Normalizer] → semantic Expr tree   let / fn / impl / call / command
//!     ↓
//! [Checker] → TypeExpr + CallTable    inference and overload resolution
//!     ↓
//! [Vm] → Value
//! ```
//!
//! Lexing through checking are *collect-all*: each phase pushes every problem it finds
//! into a [`diagnostics::Diagnostics`] sink and keeps going. Evaluation is
//! *fail-fast* and returns the first [`interpreter::EvalError`].
//!
//! ## Module Structure
//!
//! - [`lexer`] - tokens and the matcher table
//! - [`ast`] - expression and type trees
//! - [`parser`] - recursive descent into the raw tree
//! - [`normalize`] - raw tree to semantic tree
//! - [`types`] - type matching, symbol table and checker
//! - [`builtins`] - native functions (`+`, `cd`, `ls`, ...)
//! - [`interpreter`] - the VM and runtime values
//! - [`diagnostics`] - error collection and rendering
//! - [`fmt`] - pretty printing
//! - [`session`] - the whole pipeline behind one call
//! - [`config`] - TOML configuration for the binary
//!
//! ## Example
//!
//! ```
//! use nook::interpreter::Value;
//! use nook::session::Session;
//!
//! let mut session = Session::new(std::env::temp_dir());
//! session.run("(let double (fn [x int] (* x 2)))").unwrap();
//! assert_eq!(session.run("(double 21)").unwrap(), Value::Int(42));
//! ```

pub mod ast;
pub mod builtins;
pub mod config;
pub mod diagnostics;
pub mod fmt;
pub mod interpreter;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod session;
pub mod types;

pub use session::Session;
