//! # Checker
//!
//! Local, syntax-directed inference over the normalized tree. Every expression gets a
//! type; problems are pushed into the diagnostics sink and the offending node is typed
//! `none` so checking can continue.
//!
//! Overload resolution is the checker's other job. When a call names an impl or a
//! builtin, the first overload whose signature accepts the argument types is chosen and
//! recorded in the [`CallTable`] under the call's [`NodeId`]. The interpreter consults
//! that table instead of searching overloads again at runtime.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ast::{Call, Expr, Func, FuncType, Ident, NodeId, TypeExpr};
use crate::diagnostics::Diagnostics;

use super::error::TypeError;
use super::symbol::{Entry, SymbolTable};
use super::ty::{expected_param, matches, matches_arity, matches_func};

/// Resolved callees keyed by the id of the call that names them. Values are either
/// [`Expr::Impl`] or [`Expr::Builtin`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallTable {
    resolved: HashMap<NodeId, Expr>,
}

impl CallTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, callee: Expr) {
        self.resolved.insert(id, callee);
    }

    pub fn get(&self, id: NodeId) -> Option<&Expr> {
        self.resolved.get(&id)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Merge in resolutions from a later check.
    pub fn extend(&mut self, other: CallTable) {
        self.resolved.extend(other.resolved);
    }
}

#[derive(Clone)]
pub struct Checker {
    symbols: SymbolTable,
    calls: CallTable,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    /// A checker whose root scope already holds the builtins.
    pub fn new() -> Self {
        Self::with_symbols(SymbolTable::with_builtins())
    }

    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self {
            symbols,
            calls: CallTable::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn calls(&self) -> &CallTable {
        &self.calls
    }

    /// Hand over the resolutions made so far and start a fresh table.
    pub fn take_calls(&mut self) -> CallTable {
        std::mem::take(&mut self.calls)
    }

    /// Check every expression in order, so earlier `let`s are visible to later ones.
    pub fn infer_program(&mut self, program: &[Expr], diagnostics: &mut Diagnostics) -> Vec<TypeExpr> {
        let types = program
            .iter()
            .map(|expr| self.infer(expr, diagnostics))
            .collect::<Vec<_>>();
        debug!(
            expressions = program.len(),
            resolved_calls = self.calls.len(),
            errors = diagnostics.len(),
            "checked program"
        );
        types
    }

    pub fn infer(&mut self, expr: &Expr, diagnostics: &mut Diagnostics) -> TypeExpr {
        match expr {
            Expr::Int(_) => TypeExpr::Int,
            Expr::Float(_) => TypeExpr::Float,
            Expr::String(_) => TypeExpr::String,
            Expr::Atom(_) => TypeExpr::Atom,
            Expr::Bool(_) => TypeExpr::Bool,
            Expr::Path(_) => TypeExpr::Path,
            Expr::Flag(_) => TypeExpr::Flag,
            Expr::Identifier(ident) => self.infer_identifier(ident, diagnostics),
            Expr::Let(let_) => {
                self.symbols.open_scope();
                let ty = self.infer(&let_.value, diagnostics);
                self.symbols.close_scope();

                if let Err(error) = self.symbols.add_let(&let_.identifier, ty) {
                    diagnostics.push(error, Some(let_.identifier.token.position));
                }
                TypeExpr::None
            }
            Expr::Func(func) => TypeExpr::Func(self.infer_func(func, diagnostics)),
            Expr::Impl(impl_) => {
                let ty = self.infer_func(&impl_.func, diagnostics);
                let position = impl_.identifier.token.position;
                let mut resolved = impl_.clone();
                resolved.func.ty = ty;
                if let Err(error) = self.symbols.add_impl(resolved) {
                    diagnostics.push(error, Some(position));
                }
                TypeExpr::None
            }
            Expr::Command(command) => {
                self.infer_scratch(&command.args, diagnostics);
                TypeExpr::String
            }
            Expr::Call(call) => self.infer_call(call, diagnostics),
            Expr::Builtin(builtin) => TypeExpr::Func(builtin.signature.clone()),
            other => {
                diagnostics.push(TypeError::InvalidExpression(other.describe()), other.position());
                TypeExpr::None
            }
        }
    }

    fn infer_identifier(&mut self, ident: &Ident, diagnostics: &mut Diagnostics) -> TypeExpr {
        let error = match self.symbols.lookup(&ident.name) {
            Some(Entry::Value(entry)) => return entry.ty.clone(),
            Some(entry) => TypeError::NotAValue {
                name: ident.name.clone(),
                kind: entry.kind_name(),
            },
            None => TypeError::UnknownIdentifier(ident.name.clone()),
        };
        diagnostics.push(error, Some(ident.token.position));
        TypeExpr::None
    }

    /// The signature of a function literal, with its return type filled in from the body
    /// when it was left to inference.
    fn infer_func(&mut self, func: &Func, diagnostics: &mut Diagnostics) -> FuncType {
        self.symbols.open_scope();
        for param in &func.ty.params.params {
            if let Some(ident) = &param.identifier {
                if let Err(error) = self.symbols.add_let(ident, param.ty.clone()) {
                    diagnostics.push(error, Some(ident.token.position));
                }
            }
        }
        let body = self.infer(&func.body, diagnostics);
        self.symbols.close_scope();

        let ret = match func.ty.ret.as_ref() {
            TypeExpr::Trait => body,
            declared => {
                if !matches(&body, declared) {
                    diagnostics.push(
                        TypeError::ReturnType {
                            expected: declared.clone(),
                            found: body,
                        },
                        func.body.position(),
                    );
                }
                declared.clone()
            }
        };

        FuncType::new(func.ty.params.clone(), ret)
    }

    /// Types of `exprs`, inferred in a scope that is discarded afterwards.
    fn infer_scratch(&mut self, exprs: &[Expr], diagnostics: &mut Diagnostics) -> Vec<TypeExpr> {
        self.symbols.open_scope();
        let types = exprs
            .iter()
            .map(|expr| self.infer(expr, diagnostics))
            .collect();
        self.symbols.close_scope();
        types
    }

    fn infer_call(&mut self, call: &Call, diagnostics: &mut Diagnostics) -> TypeExpr {
        let args = self.infer_scratch(&call.args, diagnostics);

        let ident = match call.func.as_ref() {
            Expr::Identifier(ident) => ident,
            Expr::Func(func) => {
                let ty = self.infer_func(func, diagnostics);
                return call_value(&TypeExpr::Func(ty), &args, call.position, diagnostics);
            }
            other => {
                let ty = self.infer(other, diagnostics);
                return call_value(&ty, &args, call.position, diagnostics);
            }
        };

        let resolved = match self.symbols.lookup(&ident.name) {
            Some(Entry::Value(entry)) => {
                let ty = entry.ty.clone();
                return call_value(&ty, &args, call.position, diagnostics);
            }
            Some(Entry::Impl(overloads)) => overloads
                .iter()
                .find(|overload| matches_func(&args, &overload.signature))
                .map(|overload| {
                    (
                        Expr::Impl(overload.implementation.clone()),
                        overload.signature.ret.as_ref().clone(),
                    )
                }),
            Some(Entry::Builtin(overloads)) => overloads
                .iter()
                .find(|overload| matches_func(&args, &overload.signature))
                .map(|overload| {
                    (
                        Expr::Builtin(overload.implementation.clone()),
                        overload.signature.ret.as_ref().clone(),
                    )
                }),
            None => {
                diagnostics.push(
                    TypeError::UnknownIdentifier(ident.name.clone()),
                    Some(ident.token.position),
                );
                return TypeExpr::None;
            }
        };

        match resolved {
            Some((callee, ret)) => {
                trace!(name = %ident.name, id = call.id.0, ret = %ret, "resolved overload");
                self.calls.insert(call.id, callee);
                ret
            }
            None => {
                diagnostics.push(
                    TypeError::no_matching_overload(&ident.name, &args),
                    Some(call.position),
                );
                TypeExpr::None
            }
        }
    }
}

/// A call through a function-typed value.
fn call_value(
    ty: &TypeExpr,
    args: &[TypeExpr],
    position: usize,
    diagnostics: &mut Diagnostics,
) -> TypeExpr {
    let func = match ty {
        TypeExpr::Func(func) => func,
        TypeExpr::Trait => return TypeExpr::Trait,
        other => {
            diagnostics.push(TypeError::NotCallable(other.clone()), Some(position));
            return TypeExpr::None;
        }
    };

    if !matches_arity(args, func) {
        diagnostics.push(
            TypeError::Arity {
                expected: func.arity(),
                found: args.len(),
            },
            Some(position),
        );
        return TypeExpr::None;
    }

    for (index, arg) in args.iter().enumerate() {
        if let Some(expected) = expected_param(func, index) {
            if !matches(arg, expected) {
                diagnostics.push(
                    TypeError::ArgumentType {
                        index,
                        expected: expected.clone(),
                        found: arg.clone(),
                    },
                    Some(position),
                );
            }
        }
    }

    func.ret.as_ref().clone()
}
