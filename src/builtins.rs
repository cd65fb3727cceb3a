//! Native functions exposed to scripts.
//!
//! Every entry of [`registry`] is one overload: a name, a signature the checker matches
//! call arguments against, and the native implementation the VM invokes once the checker
//! has picked that overload. Several entries may share a name.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::ast::{FuncType, TypeExpr};
use crate::interpreter::{EvalError, Kind, Value, Vm};

/// Signature of a native implementation. Arguments arrive already evaluated.
pub type NativeFn = fn(&mut Vm, &[Value]) -> Result<Value, EvalError>;

#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub signature: FuncType,
    pub native: NativeFn,
}

impl Builtin {
    fn new(name: &'static str, signature: FuncType, native: NativeFn) -> Self {
        Self {
            name,
            signature,
            native,
        }
    }

    pub fn call(&self, vm: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
        (self.native)(vm, args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

// Two handles are the same overload when name and signature agree.
impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.signature == other.signature
    }
}

/// All builtin overloads, in registration order.
pub fn registry() -> Vec<Builtin> {
    let int_fold = |ret| FuncType::anonymous([TypeExpr::variadic(TypeExpr::Int)], ret);
    let float_fold = |ret| FuncType::anonymous([TypeExpr::variadic(TypeExpr::Float)], ret);
    let binary = |ty: TypeExpr| FuncType::anonymous([ty.clone(), ty], TypeExpr::Bool);

    let mut builtins = vec![
        Builtin::new("+", int_fold(TypeExpr::Int), add_int),
        Builtin::new("+", float_fold(TypeExpr::Float), add_float),
        Builtin::new("-", int_fold(TypeExpr::Int), sub_int),
        Builtin::new("-", float_fold(TypeExpr::Float), sub_float),
        Builtin::new("*", int_fold(TypeExpr::Int), mul_int),
        Builtin::new("*", float_fold(TypeExpr::Float), mul_float),
        Builtin::new("/", int_fold(TypeExpr::Int), div_int),
        Builtin::new("/", float_fold(TypeExpr::Float), div_float),
        Builtin::new(">", binary(TypeExpr::Int), greater_than),
        Builtin::new(">", binary(TypeExpr::Float), greater_than),
        Builtin::new("<", binary(TypeExpr::Int), less_than),
        Builtin::new("<", binary(TypeExpr::Float), less_than),
        Builtin::new(">=", binary(TypeExpr::Int), greater_equal),
        Builtin::new(">=", binary(TypeExpr::Float), greater_equal),
        Builtin::new("<=", binary(TypeExpr::Int), less_equal),
        Builtin::new("<=", binary(TypeExpr::Float), less_equal),
    ];

    for ty in [
        TypeExpr::Int,
        TypeExpr::Float,
        TypeExpr::Bool,
        TypeExpr::String,
        TypeExpr::Atom,
        TypeExpr::Path,
        TypeExpr::Flag,
    ] {
        builtins.push(Builtin::new("==", binary(ty), equal));
    }

    builtins.extend([
        Builtin::new(
            "cd",
            FuncType::anonymous([TypeExpr::Path], TypeExpr::None),
            change_dir,
        ),
        Builtin::new(
            "cd",
            FuncType::anonymous([TypeExpr::String], TypeExpr::None),
            change_dir,
        ),
        Builtin::new("ls", FuncType::anonymous([], TypeExpr::String), list_files),
        Builtin::new("pwd", FuncType::anonymous([], TypeExpr::Path), print_dir),
    ]);

    builtins
}

fn ints(op: &'static str, args: &[Value]) -> Result<Vec<i64>, EvalError> {
    if args.is_empty() {
        return Err(EvalError::MissingOperands(op));
    }
    args.iter()
        .map(|arg| match arg {
            Value::Int(value) => Ok(*value),
            other => Err(EvalError::OperandKind {
                op,
                expected: Kind::Int,
                found: other.kind(),
            }),
        })
        .collect()
}

fn floats(op: &'static str, args: &[Value]) -> Result<Vec<f64>, EvalError> {
    if args.is_empty() {
        return Err(EvalError::MissingOperands(op));
    }
    args.iter()
        .map(|arg| match arg {
            Value::Float(value) => Ok(*value),
            other => Err(EvalError::OperandKind {
                op,
                expected: Kind::Float,
                found: other.kind(),
            }),
        })
        .collect()
}

fn fold_int(
    op: &'static str,
    args: &[Value],
    step: fn(i64, i64) -> Option<i64>,
) -> Result<Value, EvalError> {
    let values = ints(op, args)?;
    let mut acc = values[0];
    for value in &values[1..] {
        acc = step(acc, *value).ok_or(EvalError::Overflow(op))?;
    }
    Ok(Value::Int(acc))
}

fn fold_float(op: &'static str, args: &[Value], step: fn(f64, f64) -> f64) -> Result<Value, EvalError> {
    let values = floats(op, args)?;
    Ok(Value::Float(values[1..].iter().fold(values[0], |acc, v| step(acc, *v))))
}

fn add_int(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_int("+", args, i64::checked_add)
}

fn add_float(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_float("+", args, |a, b| a + b)
}

fn sub_int(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_int("-", args, i64::checked_sub)
}

fn sub_float(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_float("-", args, |a, b| a - b)
}

fn mul_int(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_int("*", args, i64::checked_mul)
}

fn mul_float(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_float("*", args, |a, b| a * b)
}

fn div_int(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    let values = ints("/", args)?;
    let mut acc = values[0];
    for value in &values[1..] {
        if *value == 0 {
            return Err(EvalError::DivisionByZero);
        }
        acc = acc.checked_div(*value).ok_or(EvalError::Overflow("/"))?;
    }
    Ok(Value::Int(acc))
}

fn div_float(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    fold_float("/", args, |a, b| a / b)
}

fn compare(
    op: &'static str,
    args: &[Value],
    int: fn(&i64, &i64) -> bool,
    float: fn(&f64, &f64) -> bool,
) -> Result<Value, EvalError> {
    match args {
        [Value::Int(a), Value::Int(b)] => Ok(Value::Bool(int(a, b))),
        [Value::Float(a), Value::Float(b)] => Ok(Value::Bool(float(a, b))),
        [a, b] => Err(EvalError::OperandKind {
            op,
            expected: a.kind(),
            found: b.kind(),
        }),
        _ => Err(EvalError::Arity {
            expected: 2,
            found: args.len(),
        }),
    }
}

fn greater_than(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    compare(">", args, |a, b| a > b, |a, b| a > b)
}

fn less_than(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    compare("<", args, |a, b| a < b, |a, b| a < b)
}

fn greater_equal(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    compare(">=", args, |a, b| a >= b, |a, b| a >= b)
}

fn less_equal(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    compare("<=", args, |a, b| a <= b, |a, b| a <= b)
}

fn equal(_: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [a, b] if a.kind() == b.kind() => Ok(Value::Bool(a == b)),
        [a, b] => Err(EvalError::OperandKind {
            op: "==",
            expected: a.kind(),
            found: b.kind(),
        }),
        _ => Err(EvalError::Arity {
            expected: 2,
            found: args.len(),
        }),
    }
}

fn change_dir(vm: &mut Vm, args: &[Value]) -> Result<Value, EvalError> {
    let target = match args {
        [Value::Path(path) | Value::String(path)] => path,
        [other] => {
            return Err(EvalError::OperandKind {
                op: "cd",
                expected: Kind::Path,
                found: other.kind(),
            });
        }
        _ => {
            return Err(EvalError::Arity {
                expected: 1,
                found: args.len(),
            });
        }
    };

    let joined = vm.working_dir().join(target);
    let resolved = joined
        .canonicalize()
        .map_err(|source| EvalError::Directory {
            path: joined.clone(),
            source,
        })?;
    if !resolved.is_dir() {
        return Err(EvalError::NotADirectory(resolved));
    }

    debug!(from = %vm.working_dir().display(), to = %resolved.display(), "changing directory");
    vm.set_working_dir(resolved);
    Ok(Value::None)
}

fn list_files(vm: &mut Vm, _: &[Value]) -> Result<Value, EvalError> {
    let names = read_names(vm.working_dir())?;
    let quoted = names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>();
    Ok(Value::String(format!("[ {} ]", quoted.join(" "))))
}

fn read_names(dir: &Path) -> Result<Vec<String>, EvalError> {
    let to_error = |source| EvalError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = vec![];
    for entry in fs::read_dir(dir).map_err(to_error)? {
        let entry = entry.map_err(to_error)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn print_dir(vm: &mut Vm, _: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Path(vm.working_dir().display().to_string()))
}
