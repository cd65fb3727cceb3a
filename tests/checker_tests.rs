use nook::ast::{Expr, Ident, TypeExpr};
use nook::diagnostics::{DiagnosticError, Diagnostics};
use nook::lexer::{Kind, Token, lex};
use nook::normalize::Normalizer;
use nook::parser::parse_program;
use nook::types::{Checker, SymbolTable, TypeError};

struct Checked {
    checker: Checker,
    program: Vec<Expr>,
    types: Vec<TypeExpr>,
    errors: Vec<TypeError>,
}

fn check(source: &str) -> Checked {
    let mut diagnostics = Diagnostics::new();
    let raw = parse_program(lex(source), &mut diagnostics);
    let program = Normalizer::new().normalize_program(raw, &mut diagnostics);
    assert!(diagnostics.is_empty(), "front-end errors: {diagnostics}");

    let mut checker = Checker::new();
    let types = checker.infer_program(&program, &mut diagnostics);
    let errors = diagnostics
        .iter()
        .map(|diagnostic| match &diagnostic.error {
            DiagnosticError::Type(error) => error.clone(),
            other => panic!("unexpected diagnostic {other:?}"),
        })
        .collect();

    Checked {
        checker,
        program,
        types,
        errors,
    }
}

fn last_type(source: &str) -> TypeExpr {
    let checked = check(source);
    assert!(checked.errors.is_empty(), "type errors: {:?}", checked.errors);
    checked.types.last().cloned().unwrap()
}

fn ident(name: &str) -> Ident {
    Ident {
        name: name.to_string(),
        token: Token::new(0, name, Kind::Identifier),
    }
}

#[test]
fn resolves_int_overload() {
    let checked = check("(+ 1 2)");
    assert!(checked.errors.is_empty());
    assert_eq!(checked.types, vec![TypeExpr::Int]);

    let Expr::Call(call) = &checked.program[0] else {
        panic!("expected a call");
    };
    let Some(Expr::Builtin(builtin)) = checked.checker.calls().get(call.id) else {
        panic!("call was not resolved to a builtin");
    };
    assert_eq!(builtin.name, "+");
    assert_eq!(
        builtin.signature.params.params[0].ty,
        TypeExpr::variadic(TypeExpr::Int)
    );
}

#[test]
fn resolves_float_overload() {
    assert_eq!(last_type("(* 1.5 2.0 4.0)"), TypeExpr::Float);
}

#[test]
fn mixed_arithmetic_has_no_overload() {
    let checked = check("(+ 1 2.5)");
    assert_eq!(
        checked.errors,
        vec![TypeError::NoMatchingOverload {
            name: "+".to_string(),
            args: "int float".to_string(),
        }]
    );
    assert_eq!(checked.types, vec![TypeExpr::None]);
    assert!(checked.checker.calls().is_empty());
}

#[test]
fn unknown_identifier() {
    assert_eq!(
        check("(frobnicate 1)").errors,
        vec![TypeError::UnknownIdentifier("frobnicate".to_string())]
    );
}

#[test]
fn let_bindings_are_visible_later() {
    assert_eq!(last_type("(let a 1) (+ a 2)"), TypeExpr::Int);
}

#[test]
fn let_value_scope_is_discarded() {
    let checked = check("(let a (let b 1)) b");
    assert_eq!(
        checked.errors,
        vec![TypeError::UnknownIdentifier("b".to_string())]
    );
}

#[test]
fn function_type_is_inferred_from_body() {
    let ty = last_type("(fn [x int] (+ x 1))");
    assert_eq!(ty.to_string(), "fn(int) int");
}

#[test]
fn declared_return_type_is_checked() {
    assert_eq!(
        check("(fn [x int] str x)").errors,
        vec![TypeError::ReturnType {
            expected: TypeExpr::String,
            found: TypeExpr::Int,
        }]
    );
}

#[test]
fn call_through_value_checks_arity() {
    assert_eq!(
        check("(let f (fn [x int] x)) (f 1 2)").errors,
        vec![TypeError::Arity {
            expected: 1,
            found: 2,
        }]
    );
}

#[test]
fn call_through_value_checks_argument_types() {
    assert_eq!(
        check("(let f (fn [x int] x)) (f 1.5)").errors,
        vec![TypeError::ArgumentType {
            index: 0,
            expected: TypeExpr::Int,
            found: TypeExpr::Float,
        }]
    );
}

#[test]
fn function_literal_call() {
    assert_eq!(last_type("((fn [a b int] (- a b)) 5 3)"), TypeExpr::Int);
}

#[test]
fn impl_overloads_are_resolved() {
    let checked = check(
        r#"
        (impl show (fn [x int] str "int"))
        (impl show (fn [x float] str "float"))
        (show 1.5)
        "#,
    );
    assert!(checked.errors.is_empty());
    assert_eq!(checked.types.last(), Some(&TypeExpr::String));

    let Expr::Call(call) = &checked.program[2] else {
        panic!("expected a call");
    };
    let Some(Expr::Impl(impl_)) = checked.checker.calls().get(call.id) else {
        panic!("call was not resolved to an impl");
    };
    assert_eq!(impl_.func.ty.params.params[0].ty, TypeExpr::Float);

    let Expr::Impl(declared) = &checked.program[1] else {
        panic!("expected an impl");
    };
    assert_eq!(impl_.id, declared.id);
}

#[test]
fn impl_overloads_are_kept_in_order() {
    let checked = check(
        r#"
        (impl show (fn [x int] "int"))
        (impl show (fn [x float] str "float"))
        "#,
    );
    assert!(checked.errors.is_empty());

    let symbols = checked.checker.symbols();
    let overloads = symbols.lookup_impl("show").unwrap();
    let params = overloads
        .iter()
        .map(|overload| overload.signature.params.params[0].ty.clone())
        .collect::<Vec<_>>();
    assert_eq!(params, vec![TypeExpr::Int, TypeExpr::Float]);
    // the inferred return type is part of the signature
    assert_eq!(*overloads[0].signature.ret, TypeExpr::String);

    assert!(symbols.lookup_impl("missing").is_none());
    assert!(symbols.lookup_impl("+").is_none());
    assert!(symbols.lookup_value("show").is_none());
}

#[test]
fn impl_without_matching_overload() {
    let checked = check("(impl show (fn [x int] str \"int\")) (show 'atom)");
    assert_eq!(
        checked.errors,
        vec![TypeError::NoMatchingOverload {
            name: "show".to_string(),
            args: "atom".to_string(),
        }]
    );
}

#[test]
fn rebinding_a_different_kind_is_an_error() {
    let checked = check("(let a 1) (impl a (fn [x int] x))");
    assert_eq!(
        checked.errors,
        vec![TypeError::KindConflict {
            name: "a".to_string(),
            existing: "a value",
            new: "an impl",
        }]
    );
}

#[test]
fn builtins_are_not_values() {
    assert_eq!(
        check("(let plus +)").errors,
        vec![TypeError::NotAValue {
            name: "+".to_string(),
            kind: "a builtin",
        }]
    );
}

#[test]
fn non_functions_are_not_callable() {
    assert_eq!(
        check("(let a 1) (a 2)").errors,
        vec![TypeError::NotCallable(TypeExpr::Int)]
    );
}

#[test]
fn untyped_parameters_can_be_called() {
    let ty = last_type("(fn [f] (f 1))");
    assert_eq!(ty.to_string(), "fn(any) any");
}

#[test]
fn comparisons() {
    assert_eq!(last_type("(== 'a 'b)"), TypeExpr::Bool);
    assert_eq!(last_type("(<= 1.0 2.0)"), TypeExpr::Bool);
    assert_eq!(check("(== 1 'a)").errors.len(), 1);
}

#[test]
fn builtin_shell_functions() {
    assert_eq!(last_type("(cd ./src)"), TypeExpr::None);
    assert_eq!(last_type("(cd \"src\")"), TypeExpr::None);
    assert_eq!(last_type("(ls)"), TypeExpr::String);
    assert_eq!(last_type("(pwd)"), TypeExpr::Path);
    assert_eq!(check("(cd 1)").errors.len(), 1);
}

#[test]
fn command_arguments_are_checked() {
    let checked = check("($echo (+ 1 2.5) (nope))");
    assert_eq!(checked.errors.len(), 2);
    assert_eq!(checked.types, vec![TypeExpr::String]);
}

#[test]
fn errors_accumulate_across_expressions() {
    let checked = check("(+ 1 2.5) (nope) (- 3 1)");
    assert_eq!(checked.errors.len(), 2);
    assert_eq!(checked.types[2], TypeExpr::Int);
}

#[test]
fn nested_scope_shadows_parent() {
    let mut symbols = SymbolTable::new();
    symbols.add_let(&ident("a"), TypeExpr::Int).unwrap();

    symbols.open_scope();
    symbols.add_let(&ident("a"), TypeExpr::String).unwrap();
    assert_eq!(symbols.lookup_value("a").unwrap().ty, TypeExpr::String);
    symbols.close_scope();

    assert_eq!(symbols.lookup_value("a").unwrap().ty, TypeExpr::Int);
}

#[test]
fn different_kind_may_shadow_in_child_scope() {
    let mut symbols = SymbolTable::with_builtins();
    symbols.open_scope();
    assert!(symbols.add_let(&ident("ls"), TypeExpr::Int).is_ok());
    assert!(symbols.lookup_builtin("ls").is_none());
    symbols.close_scope();
    assert!(symbols.lookup_builtin("ls").is_some());
}

#[test]
fn let_replaces_value_in_same_scope() {
    let mut symbols = SymbolTable::new();
    symbols.add_let(&ident("a"), TypeExpr::Int).unwrap();
    symbols.add_let(&ident("a"), TypeExpr::Path).unwrap();
    assert_eq!(symbols.lookup_value("a").unwrap().ty, TypeExpr::Path);
}
