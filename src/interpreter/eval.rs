use std::process;
use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::ast::{Call, Command, Expr, Func};
use crate::types::{CallTable, Env};

use super::value::{CapturedEnv, Closure, Value};
use super::{EvalError, Vm};

impl Vm {
    /// Evaluate every expression in order and return the last value, or `none` for an
    /// empty program.
    pub fn eval_program(
        &mut self,
        program: &[Expr],
        calls: &Rc<CallTable>,
    ) -> Result<Value, EvalError> {
        let mut last = Value::None;
        for expr in program {
            last = self.eval(expr, calls)?;
        }
        Ok(last)
    }

    /// Evaluate `expr`. Calls are resolved through `calls`, the table produced when
    /// `expr` was checked.
    pub fn eval(&mut self, expr: &Expr, calls: &Rc<CallTable>) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(lit) => Ok(Value::Int(lit.value)),
            Expr::Float(lit) => Ok(Value::Float(lit.value)),
            Expr::Bool(lit) => Ok(Value::Bool(lit.value)),
            Expr::String(lit) => Ok(Value::String(lit.value.clone())),
            Expr::Atom(lit) => Ok(Value::Atom(lit.value.clone())),
            Expr::Path(lit) => Ok(Value::Path(lit.value.clone())),
            Expr::Flag(lit) => Ok(Value::Flag(lit.value.clone())),
            Expr::Identifier(ident) => self
                .scope
                .resolve(&ident.name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownIdentifier(ident.name.clone())),
            Expr::Let(let_) => {
                self.scope.enter();
                let value = self.eval(&let_.value, calls);
                self.scope.leave();
                let value = value?;
                trace!(name = %let_.identifier.name, kind = %value.kind(), "bound value");
                self.scope.add(let_.identifier.name.clone(), value);
                Ok(Value::None)
            }
            Expr::Func(func) => Ok(Value::Func(self.closure(func, calls))),
            // The overload closes over the scope it was declared in.
            Expr::Impl(impl_) => {
                let closure = self.closure(&impl_.func, calls);
                trace!(name = %impl_.identifier.name, id = impl_.id.0, "declared impl");
                self.impls.insert(impl_.id, closure);
                Ok(Value::None)
            }
            Expr::Command(command) => self.run_command(command, calls),
            Expr::Call(call) => self.eval_call(call, calls),
            other => Err(EvalError::Unsupported(other.describe())),
        }
    }

    fn closure(&self, func: &Func, calls: &Rc<CallTable>) -> Rc<Closure> {
        Rc::new(Closure {
            func: func.clone(),
            captured: CapturedEnv(self.scope.flatten()),
            calls: Rc::clone(calls),
        })
    }

    fn eval_call(&mut self, call: &Call, calls: &Rc<CallTable>) -> Result<Value, EvalError> {
        match calls.get(call.id) {
            Some(Expr::Builtin(builtin)) => {
                let args = self.eval_args(&call.args, calls)?;
                trace!(name = builtin.name, args = args.len(), "calling builtin");
                builtin.call(self, &args)
            }
            Some(Expr::Impl(impl_)) => {
                let closure = self
                    .impls
                    .get(&impl_.id)
                    .cloned()
                    .ok_or_else(|| EvalError::UndeclaredImpl(impl_.identifier.name.clone()))?;
                let args = self.eval_args(&call.args, calls)?;
                self.apply(&Value::Func(closure), args)
            }
            Some(other) => Err(EvalError::Unsupported(other.describe())),
            None => {
                let callee = self.eval(&call.func, calls)?;
                let args = self.eval_args(&call.args, calls)?;
                self.apply(&callee, args)
            }
        }
    }

    /// Arguments are evaluated in a scratch frame, like the checker infers them.
    fn eval_args(&mut self, args: &[Expr], calls: &Rc<CallTable>) -> Result<Vec<Value>, EvalError> {
        self.scope.enter();
        let values = args.iter().map(|arg| self.eval(arg, calls)).collect();
        self.scope.leave();
        values
    }

    /// Run a closure body with its parameters bound over the captured scope. The
    /// caller's scope is restored whether or not the body fails.
    fn apply(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
        let Value::Func(closure) = callee else {
            return Err(EvalError::NotCallable(callee.kind()));
        };

        let params = &closure.func.ty.params.params;
        if params.len() != args.len() {
            return Err(EvalError::Arity {
                expected: params.len(),
                found: args.len(),
            });
        }

        let captured = Env::from_bindings(closure.captured.0.clone());
        let caller = std::mem::replace(&mut self.scope, captured);
        self.scope.enter();
        for (param, arg) in params.iter().zip(args) {
            if let Some(ident) = &param.identifier {
                self.scope.add(ident.name.clone(), arg);
            }
        }

        let result = self.eval(&closure.func.body, &closure.calls);
        self.scope = caller;
        result
    }

    fn run_command(&mut self, command: &Command, calls: &Rc<CallTable>) -> Result<Value, EvalError> {
        let args = self
            .eval_args(&command.args, calls)?
            .iter()
            .map(Value::to_arg)
            .collect::<Vec<_>>();

        debug!(
            program = %command.name,
            ?args,
            dir = %self.working_dir().display(),
            "spawning command"
        );
        let output = process::Command::new(&command.name)
            .args(&args)
            .current_dir(self.working_dir())
            .output()
            .map_err(|source| EvalError::Spawn {
                program: command.name.clone(),
                source,
            })?;

        self.last_status = output.status.code();
        info!(program = %command.name, status = ?self.last_status, "command finished");

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(Value::String(text))
    }
}
