use std::fmt::{self, Display};

use crate::ast::{FuncType, ImplType, TypeExpr};
use crate::interpreter::Value;

impl Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Int => f.write_str("int"),
            TypeExpr::Float => f.write_str("float"),
            TypeExpr::Bool => f.write_str("bool"),
            TypeExpr::Atom => f.write_str("atom"),
            TypeExpr::String => f.write_str("str"),
            TypeExpr::Path => f.write_str("path"),
            TypeExpr::Flag => f.write_str("flag"),
            TypeExpr::None => f.write_str("none"),
            TypeExpr::Command => f.write_str("command"),
            TypeExpr::Dict => f.write_str("dict"),
            TypeExpr::Tuple(items) => {
                f.write_str("(")?;
                write_separated(f, items, " ")?;
                f.write_str(")")
            }
            TypeExpr::Variadic(inner) => write!(f, "...{inner}"),
            TypeExpr::Func(func) => write!(f, "{func}"),
            TypeExpr::Impl(overloads) => write!(f, "{overloads}"),
            TypeExpr::Trait => f.write_str("any"),
        }
    }
}

impl Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .params
            .iter()
            .map(|param| &param.ty)
            .collect::<Vec<_>>();
        f.write_str("fn(")?;
        write_separated(f, &params, " ")?;
        write!(f, ") {}", self.ret)
    }
}

impl Display for ImplType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("impl[")?;
        write_separated(f, &self.overloads, " | ")?;
        f.write_str("]")
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Atom(text) | Value::String(text) | Value::Path(text) | Value::Flag(text) => {
                f.write_str(text)
            }
            Value::None => f.write_str("none"),
            Value::Func(closure) => write!(f, "<{}>", closure.func.ty),
        }
    }
}

pub(super) fn write_separated<T: Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
