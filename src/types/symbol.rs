//! The checker's symbol table.
//!
//! Names map to one of three kinds of [`Entry`]. A `let` binding holds exactly one
//! type; impls and builtins hold an ordered list of overloads that grows as more are
//! registered under the same name.

use tracing::trace;

use crate::ast::{FuncType, Ident, Impl, TypeExpr};
use crate::builtins::{self, Builtin};

use super::env::Env;
use super::error::TypeError;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueEntry {
    pub ty: TypeExpr,
    pub decl: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overload<T> {
    pub signature: FuncType,
    pub implementation: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Value(ValueEntry),
    Impl(Vec<Overload<Impl>>),
    Builtin(Vec<Overload<Builtin>>),
}

impl Entry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entry::Value(_) => "a value",
            Entry::Impl(_) => "an impl",
            Entry::Builtin(_) => "a builtin",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    env: Env<Entry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table whose root scope holds every builtin overload.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for builtin in builtins::registry() {
            // The registry never mixes kinds under one name.
            let _ = table.add_builtin(builtin);
        }
        table
    }

    pub fn open_scope(&mut self) {
        self.env.enter();
        trace!(depth = self.env.depth(), "opened scope");
    }

    pub fn close_scope(&mut self) {
        self.env.leave();
        trace!(depth = self.env.depth(), "closed scope");
    }

    pub fn depth(&self) -> usize {
        self.env.depth()
    }

    /// Bind `decl` in the current scope, replacing an earlier value binding there.
    pub fn add_let(&mut self, decl: &Ident, ty: TypeExpr) -> Result<(), TypeError> {
        let name = decl.name.as_str();
        if let Some(existing) = self.env.local(name) {
            if !matches!(existing, Entry::Value(_)) {
                return Err(conflict(name, existing, "a value"));
            }
        }

        trace!(name, ty = %ty, "bound value");
        self.env.add(
            name,
            Entry::Value(ValueEntry {
                ty,
                decl: decl.clone(),
            }),
        );
        Ok(())
    }

    /// Append `impl_` to the overloads of its name in the current scope. Its function
    /// type is taken as the overload's signature.
    pub fn add_impl(&mut self, impl_: Impl) -> Result<(), TypeError> {
        let name = impl_.identifier.name.clone();
        let overload = Overload {
            signature: impl_.func.ty.clone(),
            implementation: impl_,
        };

        match self.env.local_mut(&name) {
            Some(Entry::Impl(overloads)) => overloads.push(overload),
            Some(existing) => return Err(conflict(&name, existing, "an impl")),
            None => self.env.add(name.as_str(), Entry::Impl(vec![overload])),
        }
        trace!(name = %name, "added impl overload");
        Ok(())
    }

    /// Append an overload to the builtin of the same name in the current scope.
    pub fn add_builtin(&mut self, builtin: Builtin) -> Result<(), TypeError> {
        let name = builtin.name;
        let overload = Overload {
            signature: builtin.signature.clone(),
            implementation: builtin,
        };

        match self.env.local_mut(name) {
            Some(Entry::Builtin(overloads)) => overloads.push(overload),
            Some(existing) => return Err(conflict(name, existing, "a builtin")),
            None => self.env.add(name, Entry::Builtin(vec![overload])),
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.env.resolve(name)
    }

    pub fn lookup_value(&self, name: &str) -> Option<&ValueEntry> {
        match self.lookup(name)? {
            Entry::Value(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn lookup_impl(&self, name: &str) -> Option<&[Overload<Impl>]> {
        match self.lookup(name)? {
            Entry::Impl(overloads) => Some(overloads),
            _ => None,
        }
    }

    pub fn lookup_builtin(&self, name: &str) -> Option<&[Overload<Builtin>]> {
        match self.lookup(name)? {
            Entry::Builtin(overloads) => Some(overloads),
            _ => None,
        }
    }
}

fn conflict(name: &str, existing: &Entry, new: &'static str) -> TypeError {
    TypeError::KindConflict {
        name: name.to_string(),
        existing: existing.kind_name(),
        new,
    }
}
