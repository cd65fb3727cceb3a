use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use nook::interpreter::{EvalError, Value, Vm};
use nook::session::{Error, Session};
use nook::types::CallTable;
use tempfile::TempDir;

fn scratch() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().canonicalize().unwrap();
    (dir, path)
}

fn eval(source: &str) -> Value {
    let (_dir, path) = scratch();
    Session::new(path).run(source).unwrap()
}

fn eval_error(source: &str) -> EvalError {
    let (_dir, path) = scratch();
    match Session::new(path).run(source) {
        Err(Error::Eval(error)) => error,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn sum_of_ints() {
    let (_dir, path) = scratch();
    let mut session = Session::new(&path);
    assert_eq!(session.run("(+ 1 2 3)").unwrap(), Value::Int(6));
    assert_eq!(session.working_dir(), path);
}

#[test]
fn sum_ignores_prior_state() {
    let (_dir, path) = scratch();
    fs::create_dir(path.join("sub")).unwrap();
    let mut session = Session::new(&path);
    session.run("(let a 100) (cd ./sub)").unwrap();

    let before = session.working_dir().to_path_buf();
    assert_eq!(session.run("(+ 1 2 3)").unwrap(), Value::Int(6));
    assert_eq!(session.working_dir(), before);
}

#[test]
fn arithmetic_folds_left() {
    assert_eq!(eval("(- 10 3 2)"), Value::Int(5));
    assert_eq!(eval("(/ 100 5 2)"), Value::Int(10));
    assert_eq!(eval("(/ 7.0 2.0)"), Value::Float(3.5));
    assert_eq!(eval("(* 2 (+ 1 2) 4)"), Value::Int(24));
    assert_eq!(eval("(+ 5)"), Value::Int(5));
}

#[test]
fn arithmetic_errors() {
    assert!(matches!(eval_error("(/ 1 0)"), EvalError::DivisionByZero));
    assert!(matches!(eval_error("(+)"), EvalError::MissingOperands("+")));
    assert!(matches!(
        eval_error("(* 9223372036854775807 2)"),
        EvalError::Overflow("*")
    ));
}

#[test]
fn comparisons() {
    assert_eq!(eval("(> 3 2)"), Value::Bool(true));
    assert_eq!(eval("(<= 2.5 2.0)"), Value::Bool(false));
    assert_eq!(eval("(== \"a\" \"a\")"), Value::Bool(true));
    assert_eq!(eval("(== 'ok 'no)"), Value::Bool(false));
}

#[test]
fn literals_evaluate_to_themselves() {
    assert_eq!(eval("'done"), Value::Atom("'done".to_string()));
    assert_eq!(eval("--force"), Value::Flag("--force".to_string()));
    assert_eq!(eval("./notes.md"), Value::Path("./notes.md".to_string()));
    assert_eq!(eval("true"), Value::Bool(true));
    assert_eq!(eval("\"tab\\there\""), Value::String("tab\there".to_string()));
}

#[test]
fn let_returns_none_and_binds() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    assert_eq!(session.run("(let a 41)").unwrap(), Value::None);
    assert_eq!(session.vm().lookup("a"), Some(&Value::Int(41)));
    assert_eq!(session.run("(+ a 1)").unwrap(), Value::Int(42));
}

#[test]
fn cd_to_missing_directory_fails_without_side_effect() {
    let (_dir, path) = scratch();
    let mut session = Session::new(&path);
    let result = session.run("(cd ./missing)");
    assert!(matches!(result, Err(Error::Eval(EvalError::Directory { .. }))));
    assert_eq!(session.working_dir(), path);
}

#[test]
fn cd_to_relative_directory() {
    let (_dir, path) = scratch();
    fs::create_dir_all(path.join("a/b")).unwrap();
    let mut session = Session::new(&path);

    assert_eq!(session.run("(cd ./a/b)").unwrap(), Value::None);
    assert_eq!(session.working_dir(), path.join("a/b"));

    session.run("(cd ..)").unwrap();
    assert_eq!(session.working_dir(), path.join("a"));

    session.run("(cd \"b\")").unwrap();
    assert_eq!(session.working_dir(), path.join("a/b"));
}

#[test]
fn cd_to_a_file_fails() {
    let (_dir, path) = scratch();
    fs::write(path.join("file.txt"), "").unwrap();
    let mut session = Session::new(&path);
    assert!(matches!(
        session.run("(cd ./file.txt)"),
        Err(Error::Eval(EvalError::NotADirectory(_)))
    ));
    assert_eq!(session.working_dir(), path);
}

#[test]
fn ls_lists_working_directory_sorted() {
    let (_dir, path) = scratch();
    fs::write(path.join("b.txt"), "").unwrap();
    fs::write(path.join("a.txt"), "").unwrap();
    fs::create_dir(path.join("c")).unwrap();

    let mut session = Session::new(&path);
    assert_eq!(
        session.run("(ls)").unwrap(),
        Value::String("[ \"a.txt\" \"b.txt\" \"c\" ]".to_string())
    );
}

#[test]
fn pwd_reports_working_directory() {
    let (_dir, path) = scratch();
    let mut session = Session::new(&path);
    assert_eq!(
        session.run("(pwd)").unwrap(),
        Value::Path(path.display().to_string())
    );
}

#[test]
fn user_functions_are_callable() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    session.run("(let add (fn [a b int] (+ a b)))").unwrap();
    assert_eq!(session.run("(add 2 3)").unwrap(), Value::Int(5));
    assert_eq!(eval("((fn [x int] (* x x)) 7)"), Value::Int(49));
}

#[test]
fn closures_capture_their_scope() {
    let source = "
        (let n 10)
        (let addn (fn [x int] (+ x n)))
        (let n 1)
        (addn 5)
    ";
    assert_eq!(eval(source), Value::Int(15));
}

#[test]
fn higher_order_functions() {
    let source = "
        (let twice (fn [f] (fn [x int] (f (f x)))))
        ((twice (fn [y int] (* y 2))) 3)
    ";
    assert_eq!(eval(source), Value::Int(12));
}

#[test]
fn impl_overloads_dispatch_at_runtime() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    session
        .run("(impl double (fn [x int] int (* x 2))) (impl double (fn [x str] str x))")
        .unwrap();
    assert_eq!(session.run("(double 21)").unwrap(), Value::Int(42));
    assert_eq!(
        session.run("(double \"hi\")").unwrap(),
        Value::String("hi".to_string())
    );
}

#[test]
fn functions_defined_in_earlier_cells_keep_working() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    session.run("(impl inc (fn [x int] int (+ x 1)))").unwrap();
    session.run("(let inctwice (fn [x int] (inc (inc x))))").unwrap();
    assert_eq!(session.run("(inctwice 1)").unwrap(), Value::Int(3));
}

#[test]
fn impl_bodies_see_their_declaring_scope() {
    let source = "
        (let k 1)
        (impl f (fn [x int] (+ x k)))
        (let g (fn [k int] (f 2)))
        (g 100)
    ";
    assert_eq!(eval(source), Value::Int(3));

    let source = r#"
        (let k 1)
        (impl f (fn [x int] (+ x k)))
        (let g (fn [k str] (f 2)))
        (g "s")
    "#;
    assert_eq!(eval(source), Value::Int(3));
}

#[test]
fn impl_keeps_bindings_from_its_declaration() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    session.run("(let k 1) (impl f (fn [x int] (+ x k)))").unwrap();
    session.run("(let k 50)").unwrap();
    assert_eq!(session.run("(f 2)").unwrap(), Value::Int(3));
}

#[test]
fn commands_return_output_and_status() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    assert_eq!(
        session.run("($echo \"hello\" 'world --flag 3)").unwrap(),
        Value::String("hello world --flag 3\n".to_string())
    );
    assert_eq!(session.last_status(), Some(0));
}

#[test]
fn failing_command_is_not_an_error() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    let value = session.run("($sh \"-c\" \"echo oops >&2; exit 3\")").unwrap();
    assert_eq!(value, Value::String("oops\n".to_string()));
    assert_eq!(session.last_status(), Some(3));
}

#[test]
fn missing_program_is_an_error() {
    assert!(matches!(
        eval_error("($nook-no-such-program-here)"),
        EvalError::Spawn { .. }
    ));
}

#[test]
fn commands_run_in_the_working_directory() {
    let (_dir, path) = scratch();
    fs::create_dir(path.join("inner")).unwrap();
    let mut session = Session::new(&path);
    session.run("(cd ./inner)").unwrap();

    let Value::String(output) = session.run("($pwd)").unwrap() else {
        panic!("expected command output");
    };
    assert_eq!(PathBuf::from(output.trim()), path.join("inner"));
}

#[test]
fn evaluation_stops_at_first_error() {
    let (_dir, path) = scratch();
    let mut session = Session::new(path);
    let result = session.run("(let a 1) (/ 1 0) (let b 2)");
    assert!(matches!(result, Err(Error::Eval(EvalError::DivisionByZero))));
    assert_eq!(session.vm().lookup("a"), Some(&Value::Int(1)));
    assert_eq!(session.vm().lookup("b"), None);
}

#[test]
fn vm_reports_unknown_identifiers() {
    let mut vm = Vm::new(std::env::temp_dir());
    let mut diagnostics = nook::diagnostics::Diagnostics::new();
    let program = nook::parser::parse_program(nook::lexer::lex("ghost"), &mut diagnostics);
    let result = vm.eval_program(&program, &Rc::new(CallTable::new()));
    assert!(matches!(result, Err(EvalError::UnknownIdentifier(name)) if name == "ghost"));
}
