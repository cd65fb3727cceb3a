use std::fmt::{self, Display};

use crate::ast::{Expr, Func, TypeExpr};

use super::types::write_separated;

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::SExpr(sexpr) => {
                let (open, close) = match sexpr.operator.as_ref() {
                    Expr::SSquare(_) => ("[", "]"),
                    Expr::SCurly(_) => ("{", "}"),
                    operator => {
                        write!(f, "({operator}")?;
                        for operand in &sexpr.operands {
                            write!(f, " {operand}")?;
                        }
                        return f.write_str(")");
                    }
                };
                f.write_str(open)?;
                write_separated(f, &sexpr.operands, " ")?;
                f.write_str(close)
            }
            Expr::SCommand(token)
            | Expr::SFunc(token)
            | Expr::SLet(token)
            | Expr::SImpl(token)
            | Expr::SSquare(token)
            | Expr::SCurly(token) => f.write_str(&token.value),
            Expr::Int(lit) => write!(f, "{}", lit.value),
            Expr::Float(lit) => write!(f, "{:?}", lit.value),
            Expr::String(lit) => write_quoted(f, &lit.value),
            Expr::Atom(lit) | Expr::Path(lit) | Expr::Flag(lit) => f.write_str(&lit.value),
            Expr::Bool(lit) => write!(f, "{}", lit.value),
            Expr::Identifier(ident) => f.write_str(&ident.name),
            Expr::Type(name) => write!(f, "{}", name.ty),
            Expr::Let(let_) => write!(f, "(let {} {})", let_.identifier.name, let_.value),
            Expr::Func(func) => write_func(f, func),
            Expr::Impl(impl_) => {
                write!(f, "(impl {} ", impl_.identifier.name)?;
                write_func(f, &impl_.func)?;
                f.write_str(")")
            }
            Expr::Command(command) => {
                write!(f, "(${}", command.name)?;
                for arg in &command.args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            Expr::Call(call) => {
                write!(f, "({}", call.func)?;
                for arg in &call.args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            Expr::Builtin(builtin) => write!(f, "<builtin {} {}>", builtin.name, builtin.signature),
        }
    }
}

/// `(fn [a b int] int body)`, omitting types left to inference.
fn write_func(f: &mut fmt::Formatter<'_>, func: &Func) -> fmt::Result {
    f.write_str("(fn [")?;
    for (index, param) in func.ty.params.params.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        if let Some(ident) = &param.identifier {
            f.write_str(&ident.name)?;
        }
        if param.ty != TypeExpr::Trait {
            write!(f, " {}", param.ty)?;
        }
    }
    f.write_str("] ")?;
    if *func.ty.ret != TypeExpr::Trait {
        write!(f, "{} ", func.ty.ret)?;
    }
    write!(f, "{})", func.body)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}
