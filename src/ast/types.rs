use crate::lexer::Kind;

use super::expression::Ident;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Int,
    Float,
    Bool,
    Atom,
    String,
    Path,
    Flag,
    None,
    Command,
    Dict,
    Tuple(Vec<TypeExpr>),
    /// Only valid as the last parameter of a function type.
    Variadic(Box<TypeExpr>),
    Func(FuncType),
    Impl(ImplType),
    /// Placeholder for a type that is not constrained yet. Matches anything.
    Trait,
}

impl TypeExpr {
    /// The type named by a type keyword token.
    pub fn from_keyword(kind: Kind) -> Option<Self> {
        let ty = match kind {
            Kind::IntType => TypeExpr::Int,
            Kind::FloatType => TypeExpr::Float,
            Kind::BoolType => TypeExpr::Bool,
            Kind::StringType => TypeExpr::String,
            Kind::PathType => TypeExpr::Path,
            Kind::FlagType => TypeExpr::Flag,
            Kind::AtomType => TypeExpr::Atom,
            Kind::CommandType => TypeExpr::Command,
            Kind::NoneType => TypeExpr::None,
            _ => return None,
        };
        Some(ty)
    }

    pub fn variadic(inner: TypeExpr) -> Self {
        TypeExpr::Variadic(Box::new(inner))
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            TypeExpr::Func(func) => Some(func),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: ParamList,
    pub ret: Box<TypeExpr>,
}

impl FuncType {
    pub fn new(params: ParamList, ret: TypeExpr) -> Self {
        Self {
            params,
            ret: Box::new(ret),
        }
    }

    /// A signature with unnamed parameters, as used for builtins.
    pub fn anonymous(params: impl IntoIterator<Item = TypeExpr>, ret: TypeExpr) -> Self {
        Self::new(
            ParamList {
                params: params.into_iter().map(Param::anonymous).collect(),
            },
            ret,
        )
    }

    pub fn arity(&self) -> usize {
        self.params.params.len()
    }

    /// The element type of a trailing variadic parameter.
    pub fn variadic_element(&self) -> Option<&TypeExpr> {
        match self.params.params.last().map(|param| &param.ty) {
            Some(TypeExpr::Variadic(inner)) => Some(inner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamList {
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// `None` for builtin signatures.
    pub identifier: Option<Ident>,
    pub ty: TypeExpr,
}

impl Param {
    pub fn anonymous(ty: TypeExpr) -> Self {
        Self {
            identifier: None,
            ty,
        }
    }

    pub fn named(identifier: Ident, ty: TypeExpr) -> Self {
        Self {
            identifier: Some(identifier),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImplType {
    pub overloads: Vec<FuncType>,
}
