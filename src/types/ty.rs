//! Structural type matching.
//!
//! [`TypeExpr::Trait`] is a wildcard on either side: it stands for a type that has not
//! been constrained yet, so it matches everything.

use crate::ast::{FuncType, TypeExpr};

/// Whether a value of type `got` is accepted where `want` is expected.
pub fn matches(got: &TypeExpr, want: &TypeExpr) -> bool {
    use TypeExpr::*;

    match (got, want) {
        (Trait, _) | (_, Trait) => true,
        (Int, Int)
        | (Float, Float)
        | (Bool, Bool)
        | (Atom, Atom)
        | (String, String)
        | (Path, Path)
        | (Flag, Flag)
        | (None, None)
        | (Command, Command)
        | (Dict, Dict) => true,
        (Tuple(a), Tuple(b)) => a.len() == b.len() && a.iter().zip(b).all(|(a, b)| matches(a, b)),
        (Variadic(a), Variadic(b)) => matches(a, b),
        (Func(a), Func(b)) => matches_signature(a, b),
        (Impl(a), Impl(b)) => {
            a.overloads.len() == b.overloads.len()
                && a
                    .overloads
                    .iter()
                    .zip(&b.overloads)
                    .all(|(a, b)| matches_signature(a, b))
        }
        _ => false,
    }
}

/// Equal parameter count, pairwise parameter match and matching return types.
pub fn matches_signature(got: &FuncType, want: &FuncType) -> bool {
    got.arity() == want.arity()
        && got
            .params
            .params
            .iter()
            .zip(&want.params.params)
            .all(|(a, b)| matches(&a.ty, &b.ty))
        && matches(&got.ret, &want.ret)
}

/// Whether `args` has an acceptable length for `func`. A trailing variadic parameter
/// accepts zero or more extra arguments.
pub fn matches_arity(args: &[TypeExpr], func: &FuncType) -> bool {
    match func.variadic_element() {
        Some(_) => args.len() + 1 >= func.arity(),
        None => args.len() == func.arity(),
    }
}

/// The type expected for the argument at `index`, if the signature has one.
pub fn expected_param(func: &FuncType, index: usize) -> Option<&TypeExpr> {
    let params = &func.params.params;
    match func.variadic_element() {
        Some(element) if index + 1 >= params.len() => Some(element),
        _ => params.get(index).map(|param| &param.ty),
    }
}

/// Arity check, then every argument against its parameter. Arguments past the fixed
/// prefix are checked against the variadic element type.
pub fn matches_func(args: &[TypeExpr], func: &FuncType) -> bool {
    matches_arity(args, func)
        && args.iter().enumerate().all(|(index, arg)| {
            expected_param(func, index).is_some_and(|expected| matches(arg, expected))
        })
}
