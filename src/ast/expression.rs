use crate::builtins::Builtin;
use crate::lexer::Token;

use super::NodeId;
use super::types::{FuncType, TypeExpr};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A raw list: `(op operands...)`, `[...]` or `{...}`.
    SExpr(SExpr),
    /// `$name` in operator position, before normalization.
    SCommand(Token),
    /// The `fn` keyword in operator position, before normalization.
    SFunc(Token),
    /// The `let` keyword in operator position, before normalization.
    SLet(Token),
    /// The `impl` keyword in operator position, before normalization.
    SImpl(Token),
    /// Operator marker of a `[...]` list.
    SSquare(Token),
    /// Operator marker of a `{...}` list.
    SCurly(Token),

    Int(Literal<i64>),
    Float(Literal<f64>),
    String(Literal<String>),
    Atom(Literal<String>),
    Bool(Literal<bool>),
    Path(Literal<String>),
    Flag(Literal<String>),
    Identifier(Ident),
    /// A type keyword written in source, e.g. the `int` in `[a b int]`.
    Type(TypeName),

    Let(Let),
    Func(Func),
    Impl(Impl),
    Command(Command),
    Call(Call),
    /// A native function handle. Never written in source.
    Builtin(Builtin),
}

impl Expr {
    /// Byte offset of the node in the source, if it came from source.
    pub fn position(&self) -> Option<usize> {
        match self {
            Expr::SExpr(sexpr) => Some(sexpr.position),
            Expr::SCommand(token)
            | Expr::SFunc(token)
            | Expr::SLet(token)
            | Expr::SImpl(token)
            | Expr::SSquare(token)
            | Expr::SCurly(token) => Some(token.position),
            Expr::Int(lit) => Some(lit.token.position),
            Expr::Float(lit) => Some(lit.token.position),
            Expr::String(lit) | Expr::Atom(lit) | Expr::Path(lit) | Expr::Flag(lit) => {
                Some(lit.token.position)
            }
            Expr::Bool(lit) => Some(lit.token.position),
            Expr::Identifier(ident) => Some(ident.token.position),
            Expr::Type(name) => Some(name.token.position),
            Expr::Let(let_) => Some(let_.token.position),
            Expr::Func(func) => Some(func.token.position),
            Expr::Impl(impl_) => Some(impl_.token.position),
            Expr::Command(command) => Some(command.token.position),
            Expr::Call(call) => Some(call.position),
            Expr::Builtin(_) => None,
        }
    }

    /// Short name of the node shape, for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::SExpr(_) => "s-expression",
            Expr::SCommand(_) => "command",
            Expr::SFunc(_) => "'fn'",
            Expr::SLet(_) => "'let'",
            Expr::SImpl(_) => "'impl'",
            Expr::SSquare(_) => "square list",
            Expr::SCurly(_) => "curly list",
            Expr::Int(_) => "int literal",
            Expr::Float(_) => "float literal",
            Expr::String(_) => "string literal",
            Expr::Atom(_) => "atom literal",
            Expr::Bool(_) => "bool literal",
            Expr::Path(_) => "path literal",
            Expr::Flag(_) => "flag literal",
            Expr::Identifier(_) => "identifier",
            Expr::Type(_) => "type",
            Expr::Let(_) => "let expression",
            Expr::Func(_) => "function literal",
            Expr::Impl(_) => "impl expression",
            Expr::Command(_) => "command",
            Expr::Call(_) => "call",
            Expr::Builtin(_) => "builtin",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SExpr {
    pub operator: Box<Expr>,
    pub operands: Vec<Expr>,
    /// Position of the opening delimiter.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal<T> {
    pub value: T,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub ty: TypeExpr,
    pub token: Token,
}

/// `(let name value)`
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub token: Token,
    pub identifier: Ident,
    pub value: Box<Expr>,
}

/// `(fn [params] body)` or `(fn [params] type body)`
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub token: Token,
    pub ty: FuncType,
    pub body: Box<Expr>,
}

/// `(impl name (fn ...))` adds one overload to `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Impl {
    /// Keys the overload's runtime closure in the VM.
    pub id: NodeId,
    pub token: Token,
    pub identifier: Ident,
    pub func: Func,
}

/// `($git 'status)` runs an external program.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub token: Token,
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub id: NodeId,
    pub position: usize,
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
}
