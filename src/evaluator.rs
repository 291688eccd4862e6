use crate::environment::{Environment, UnknownSymbol};
use crate::types::{self, Atom, Builtin, Closure, TypeMismatch, Value};
use itertools::Itertools;
use std::fmt;
use std::io::{self, Write};

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UndefinedVariable(UnknownSymbol),
    NotCallable(Value),
    BadArgCount(types::BadArgCount),
    TypeMismatch(types::TypeMismatch),
    DivisionByZero,
    IOError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UndefinedVariable(UnknownSymbol(s)) => write!(f, "undefined variable '{}'", s.0),
            Error::NotCallable(value) => write!(f, "{} is not callable", value),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::DivisionByZero => write!(f, "cannot divide by zero!"),
            Error::IOError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<types::TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<types::BadArgCount> for Error {
    fn from(e: types::BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::IOError(e)
    }
}

/// Everything an evaluation needs: the environment and somewhere for
/// `print` to write.
pub struct Context {
    pub env: Environment,
    pub(crate) output: Box<dyn Write>,
}

impl Context {
    pub fn new(env: Environment, output: Box<dyn Write>) -> Self {
        Self { env, output }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Environment::default(), Box::new(io::stdout()))
    }
}

pub fn eval(ast: &Atom, ctx: &mut Context) -> Result {
    log::trace!("eval {}", ast);
    match ast {
        Atom::Number(n) => Ok(Value::Integer(*n)),
        Atom::Quoted(inner) => Ok(Value::Atom((**inner).clone())),
        Atom::Symbol(s) => ctx.env.fetch(s).map_err(Error::UndefinedVariable),
        Atom::List(elements) => match elements.split_first() {
            None => Ok(Value::Nil),
            Some((head, args)) => {
                let callable = eval(head, ctx)?;
                apply(&callable, args, ctx)
            }
        },
    }
}

/// Invokes `callable` with `args` exactly as written: the callee decides
/// which arguments to evaluate, and when.
pub fn apply(callable: &Value, args: &[Atom], ctx: &mut Context) -> Result {
    match callable {
        Value::Builtin(f) => call_builtin(f, args, ctx),
        Value::Closure(f) if f.is_macro => call_macro(f, args, ctx),
        Value::Closure(f) => call_lambda(f, args, ctx),
        _ => Err(Error::NotCallable(callable.clone())),
    }
}

pub(crate) fn pretty_print_args(args: &[Atom]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_builtin(func: &Builtin, args: &[Atom], ctx: &mut Context) -> Result {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args, ctx);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

fn call_lambda(func: &Closure, args: &[Atom], ctx: &mut Context) -> Result {
    func.arity().validate_for(args.len(), func.kind())?;
    log::trace!("Call {} with {}", func, pretty_print_args(args));
    in_snapshot(ctx, |ctx| {
        // Every argument is evaluated before any parameter is bound, so
        // arguments see the caller's bindings and never each other's.
        let values = args
            .iter()
            .map(|arg| eval(arg, ctx))
            .collect::<Result<Vec<_>>>()?;
        for (key, value) in func.parameters.iter().zip(values) {
            ctx.env.set(key.clone(), value);
        }
        eval(&func.body, ctx)
    })
}

fn call_macro(func: &Closure, args: &[Atom], ctx: &mut Context) -> Result {
    func.arity().validate_for(args.len(), func.kind())?;
    log::trace!("Expand {} with {}", func, pretty_print_args(args));
    in_snapshot(ctx, |ctx| {
        for (key, arg) in func.parameters.iter().zip(args) {
            ctx.env.set(key.clone(), Value::Atom(arg.clone()));
        }
        let expansion = eval(&func.body, ctx)?.into_atom()?;
        log::trace!("macro expanded to {}", expansion);
        eval(&expansion, ctx)
    })
}

/// Runs `body` against a copy of the active bindings, then puts the
/// caller's bindings back whether or not `body` failed.
fn in_snapshot<F>(ctx: &mut Context, body: F) -> Result
where
    F: FnOnce(&mut Context) -> Result,
{
    ctx.env.snapshot();
    let result = body(ctx);
    ctx.env.restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn run(source: &str) -> Result {
        let mut ctx = Context::default();
        let program = read_str(source).expect("program should parse");
        eval(&program, &mut ctx)
    }

    fn run_in(source: &str, ctx: &mut Context) -> Result {
        let program = read_str(source).expect("program should parse");
        eval(&program, ctx)
    }

    #[test]
    fn numbers_evaluate_to_themselves() {
        let mut ctx = Context::default();
        assert_eq!(eval(&Atom::Number(7), &mut ctx).unwrap(), Value::Integer(7));
    }

    #[test]
    fn quoted_atoms_lose_one_level() {
        let mut ctx = Context::default();
        let inner = Atom::wrap_list(vec![Atom::new_symbol("+"), Atom::Number(1)]);
        let once = eval(&Atom::quote(inner.clone()), &mut ctx).unwrap();
        assert_eq!(once, Value::Atom(inner.clone()));
        let twice = eval(&Atom::quote(Atom::quote(inner.clone())), &mut ctx).unwrap();
        assert_eq!(twice, Value::Atom(Atom::quote(inner)));
    }

    #[test]
    fn empty_list_is_nil() {
        let mut ctx = Context::default();
        assert_eq!(
            eval(&Atom::wrap_list(vec![]), &mut ctx).unwrap(),
            Value::Nil
        );
    }

    #[test]
    fn unknown_symbols_fail() {
        match run("nope") {
            Err(Error::UndefinedVariable(UnknownSymbol(s))) => assert_eq!(s.0, "nope"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_callable_heads_fail() {
        assert!(matches!(run("(1 2)"), Err(Error::NotCallable(Value::Integer(1)))));
        assert!(matches!(run("(:true)"), Err(Error::NotCallable(_))));
    }

    #[test]
    fn lambda_arguments_use_caller_bindings() {
        // b's argument refers to the caller's a, not the parameter a.
        let result = run("(set a 1); (set f (lambda (a b) b)); (f 10 a)");
        assert_eq!(result.unwrap(), Value::Integer(1));
    }

    #[test]
    fn argument_side_effects_are_discarded_with_the_call() {
        let mut ctx = Context::default();
        let source = "(set x 0); (set f (lambda (a) a)); (f (incr x))";
        assert_eq!(run_in(source, &mut ctx).unwrap(), Value::Integer(1));
        assert_eq!(run_in("x", &mut ctx).unwrap(), Value::Integer(0));
    }

    #[test]
    fn bindings_are_restored_after_failure() {
        let mut ctx = Context::default();
        run_in("(set x 1); (set f (lambda () (do (set x 2) (/ 1 0))))", &mut ctx).unwrap();
        assert!(matches!(run_in("(f)", &mut ctx), Err(Error::DivisionByZero)));
        assert_eq!(ctx.env.depth(), 0);
        assert_eq!(run_in("x", &mut ctx).unwrap(), Value::Integer(1));
    }

    #[test]
    fn macro_body_must_produce_an_atom() {
        assert!(matches!(
            run("(set m (macro () 5)); (m)"),
            Err(Error::TypeMismatch(TypeMismatch::NotAnAtom))
        ));
    }

    #[test]
    fn macro_parameters_are_raw_atoms() {
        let result = run("(set m (macro (x) `(quote-of x))); \
                          (set quote-of (lambda (v) v)); \
                          (m (+ 1 2))");
        let expected = Atom::wrap_list(vec![
            Atom::new_symbol("+"),
            Atom::Number(1),
            Atom::Number(2),
        ]);
        assert_eq!(result.unwrap(), Value::Atom(expected));
    }

    #[test]
    fn closure_arity_is_checked() {
        assert!(matches!(
            run("(set f (lambda (a) a)); (f 1 2)"),
            Err(Error::BadArgCount(_))
        ));
        assert!(matches!(
            run("(set f (lambda () 1)); (f 1)"),
            Err(Error::BadArgCount(_))
        ));
    }
}
