//! Built-ins that control when (and whether) their arguments are evaluated.

use crate::evaluator::{eval, Context, Error, Result};
use crate::types::{Atom, Closure, Int, Symbol, TypeMismatch, Value};
use std::rc::Rc;

/// Statements arrive from the reader wrapped in a quote; that one wrapper is
/// removed before the statement runs.
pub fn apply_do(args: &[Atom], ctx: &mut Context) -> Result {
    let mut last = Value::Nil;
    for arg in args {
        let statement = match arg {
            Atom::Quoted(inner) => &**inner,
            other => other,
        };
        last = eval(statement, ctx)?;
    }
    Ok(last)
}

pub fn apply_set(args: &[Atom], ctx: &mut Context) -> Result {
    let key = args[0].as_symbol()?;
    let value = eval(&args[1], ctx)?;
    log::debug!("set {} to {}", key.0, value);
    ctx.env.set(key.clone(), value);
    Ok(Value::Nil)
}

pub fn apply_if(args: &[Atom], ctx: &mut Context) -> Result {
    match eval(&args[0], ctx)?.as_bool()? {
        true => eval(&args[1], ctx),
        false => eval(&args[2], ctx),
    }
}

pub fn apply_and(args: &[Atom], ctx: &mut Context) -> Result {
    for arg in args {
        if !eval(arg, ctx)?.as_bool()? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

pub fn apply_or(args: &[Atom], ctx: &mut Context) -> Result {
    for arg in args {
        if eval(arg, ctx)?.as_bool()? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

pub fn apply_not(args: &[Atom], ctx: &mut Context) -> Result {
    Ok(Value::Bool(!eval(&args[0], ctx)?.as_bool()?))
}

fn step(args: &[Atom], ctx: &mut Context, delta: Int) -> Result {
    let key = args[0].as_symbol()?;
    let current = ctx.env.fetch(key).map_err(Error::UndefinedVariable)?;
    let updated = Value::Integer(current.as_int()?.wrapping_add(delta));
    ctx.env.set(key.clone(), updated.clone());
    Ok(updated)
}

pub fn apply_incr(args: &[Atom], ctx: &mut Context) -> Result {
    step(args, ctx, 1)
}

pub fn apply_decr(args: &[Atom], ctx: &mut Context) -> Result {
    step(args, ctx, -1)
}

pub fn apply_for(args: &[Atom], ctx: &mut Context) -> Result {
    let (init, condition, advance, body) = (&args[0], &args[1], &args[2], &args[3]);
    eval(init, ctx)?;
    while eval(condition, ctx)?.as_bool()? {
        eval(body, ctx)?;
        eval(advance, ctx)?;
    }
    Ok(Value::Nil)
}

fn make_closure(args: &[Atom], is_macro: bool) -> Result {
    let parameters = args[0]
        .as_list()?
        .iter()
        .map(|p| p.as_symbol().map(Symbol::clone))
        .collect::<std::result::Result<Vec<_>, TypeMismatch>>()?;
    let closure = Closure {
        parameters,
        body: args[1].clone(),
        is_macro,
    };
    Ok(Value::Closure(Rc::new(closure)))
}

pub fn apply_lambda(args: &[Atom], _ctx: &mut Context) -> Result {
    make_closure(args, false)
}

pub fn apply_macro(args: &[Atom], _ctx: &mut Context) -> Result {
    make_closure(args, true)
}

/// Evaluates its argument exactly once, as if it had appeared in place of
/// the call.
pub fn apply_eval(args: &[Atom], ctx: &mut Context) -> Result {
    eval(&args[0], ctx)
}
