//! # Normalizer
//!
//! Rewrites the raw tree into semantic nodes by looking at the operator of every
//! [`SExpr`]:
//!
//! | operator            | result                          |
//! |---------------------|---------------------------------|
//! | `$name`             | [`Command`]                     |
//! | `let`               | [`Let`]                         |
//! | `fn`                | [`Func`]                        |
//! | `impl`              | [`Impl`]                        |
//! | identifier          | [`Call`]                        |
//! | nested list         | [`Call`] if it is a fn or call  |
//!
//! Anything that is not an `SExpr` passes through unchanged. Whether a call target is
//! actually callable is left to the checker.

use tracing::debug;

use crate::ast::{
    Call, Command, Expr, Func, FuncType, Ident, Impl, Let, NodeId, Param, ParamList, SExpr,
    TypeExpr,
};
use crate::diagnostics::Diagnostics;
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("let expression takes 2 operands (let identifier value), found {0}")]
    LetArity(usize),
    #[error("first operand to 'let' must be an identifier, found {0}")]
    LetTarget(&'static str),
    #[error("fn expression takes 2 or 3 operands (fn [params] type? body), found {0}")]
    FnArity(usize),
    #[error("first operand to 'fn' must be a parameter list, found {0}")]
    ParamList(&'static str),
    #[error("invalid expression in parameter list: {0}")]
    InvalidParam(&'static str),
    #[error("type '{0}' in parameter list does not follow a parameter name")]
    DanglingType(String),
    #[error("return type of 'fn' must be a type, found {0}")]
    ReturnType(&'static str),
    #[error("impl expression takes 2 operands (impl identifier (fn ...)), found {0}")]
    ImplArity(usize),
    #[error("first operand to 'impl' must be an identifier, found {0}")]
    ImplTarget(&'static str),
    #[error("second operand to 'impl' must be a function literal, found {0}")]
    ImplFunc(&'static str),
    #[error("invalid s-expression operator: {0}")]
    InvalidOperator(&'static str),
    #[error("unknown s-expression operator: {0}")]
    UnknownOperator(&'static str),
}

/// Hands out [`NodeId`]s, so one normalizer should be used for a whole session.
#[derive(Debug, Default)]
pub struct Normalizer {
    next_id: usize,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Normalize every expression of a program, dropping the ones that failed.
    pub fn normalize_program(
        &mut self,
        program: Vec<Expr>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Expr> {
        let normalized = program
            .into_iter()
            .filter_map(|expr| self.normalize(expr, diagnostics))
            .collect::<Vec<_>>();
        debug!(
            expressions = normalized.len(),
            errors = diagnostics.len(),
            "normalized program"
        );
        normalized
    }

    /// Normalize one expression. `None` means an error was reported.
    pub fn normalize(&mut self, expr: Expr, diagnostics: &mut Diagnostics) -> Option<Expr> {
        match expr {
            Expr::SExpr(sexpr) => self.normalize_sexpr(sexpr, diagnostics),
            other => Some(other),
        }
    }

    fn normalize_all(&mut self, exprs: Vec<Expr>, diagnostics: &mut Diagnostics) -> Vec<Expr> {
        exprs
            .into_iter()
            .filter_map(|expr| self.normalize(expr, diagnostics))
            .collect()
    }

    fn normalize_sexpr(&mut self, sexpr: SExpr, diagnostics: &mut Diagnostics) -> Option<Expr> {
        let SExpr {
            operator,
            operands,
            position,
        } = sexpr;

        let result = match *operator {
            Expr::SCommand(token) => {
                let name = token.value.trim_start_matches('$').to_string();
                Ok(Some(Expr::Command(Command {
                    token,
                    name,
                    args: self.normalize_all(operands, diagnostics),
                })))
            }
            Expr::SLet(token) => self.normalize_let(token, operands, diagnostics),
            Expr::SFunc(token) => self
                .normalize_func(token, operands, diagnostics)
                .map(|func| func.map(Expr::Func)),
            Expr::SImpl(token) => self.normalize_impl(token, operands, diagnostics),
            Expr::Identifier(ident) => {
                let func = Expr::Identifier(ident);
                Ok(Some(self.call(position, func, operands, diagnostics)))
            }
            Expr::SExpr(inner) => match self.normalize_sexpr(inner, diagnostics) {
                Some(func @ (Expr::Func(_) | Expr::Call(_))) => {
                    Ok(Some(self.call(position, func, operands, diagnostics)))
                }
                Some(other) => Err(NormalizeError::InvalidOperator(other.describe())),
                None => Ok(None),
            },
            other => Err(NormalizeError::UnknownOperator(other.describe())),
        };

        // Ok(None) means a nested node failed and has reported already.
        match result {
            Ok(expr) => expr,
            Err(error) => {
                diagnostics.push(error, Some(position));
                None
            }
        }
    }

    fn call(
        &mut self,
        position: usize,
        func: Expr,
        operands: Vec<Expr>,
        diagnostics: &mut Diagnostics,
    ) -> Expr {
        let args = self.normalize_all(operands, diagnostics);
        Expr::Call(Call {
            id: self.next_id(),
            position,
            func: Box::new(func),
            args,
        })
    }

    fn normalize_let(
        &mut self,
        token: Token,
        operands: Vec<Expr>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Expr>, NormalizeError> {
        let [target, value] = take::<2>(operands).map_err(NormalizeError::LetArity)?;
        let Expr::Identifier(identifier) = target else {
            return Err(NormalizeError::LetTarget(target.describe()));
        };

        let Some(value) = self.normalize(value, diagnostics) else {
            return Ok(None);
        };

        Ok(Some(Expr::Let(Let {
            token,
            identifier,
            value: Box::new(value),
        })))
    }

    fn normalize_func(
        &mut self,
        token: Token,
        operands: Vec<Expr>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Func>, NormalizeError> {
        let found = operands.len();
        let mut operands = operands.into_iter();
        let (params, ret, body) = match (operands.next(), operands.next(), operands.next()) {
            (Some(params), Some(body), None) => (params, TypeExpr::Trait, body),
            (Some(params), Some(ret), Some(body)) if found == 3 => match ret {
                Expr::Type(name) => (params, name.ty, body),
                other => return Err(NormalizeError::ReturnType(other.describe())),
            },
            _ => return Err(NormalizeError::FnArity(found)),
        };

        let params = match params {
            Expr::SExpr(list) if matches!(*list.operator, Expr::SSquare(_)) => {
                normalize_params(list.operands)?
            }
            other => return Err(NormalizeError::ParamList(other.describe())),
        };

        let Some(body) = self.normalize(body, diagnostics) else {
            return Ok(None);
        };

        Ok(Some(Func {
            token,
            ty: FuncType::new(params, ret),
            body: Box::new(body),
        }))
    }

    fn normalize_impl(
        &mut self,
        token: Token,
        operands: Vec<Expr>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Expr>, NormalizeError> {
        let [target, func] = take::<2>(operands).map_err(NormalizeError::ImplArity)?;
        let Expr::Identifier(identifier) = target else {
            return Err(NormalizeError::ImplTarget(target.describe()));
        };

        let func = match self.normalize(func, diagnostics) {
            Some(Expr::Func(func)) => func,
            Some(other) => return Err(NormalizeError::ImplFunc(other.describe())),
            None => return Ok(None),
        };

        Ok(Some(Expr::Impl(Impl {
            id: self.next_id(),
            token,
            identifier,
            func,
        })))
    }
}

/// Take exactly `N` operands, or report how many there were.
fn take<const N: usize>(operands: Vec<Expr>) -> Result<[Expr; N], usize> {
    let found = operands.len();
    operands.try_into().map_err(|_| found)
}

/// `[a b int c str]`: a type applies to every untyped name before it.
/// Names never followed by a type are left to inference.
fn normalize_params(exprs: Vec<Expr>) -> Result<ParamList, NormalizeError> {
    let mut params: Vec<Param> = vec![];
    let mut untyped: Vec<Ident> = vec![];

    for expr in exprs {
        match expr {
            Expr::Identifier(ident) => untyped.push(ident),
            Expr::Type(name) => {
                if untyped.is_empty() {
                    return Err(NormalizeError::DanglingType(name.token.value));
                }
                params.extend(
                    untyped
                        .drain(..)
                        .map(|ident| Param::named(ident, name.ty.clone())),
                );
            }
            other => return Err(NormalizeError::InvalidParam(other.describe())),
        }
    }

    params.extend(
        untyped
            .into_iter()
            .map(|ident| Param::named(ident, TypeExpr::Trait)),
    );
    Ok(ParamList { params })
}
