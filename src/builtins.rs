use crate::evaluator::{self, eval, Context};
use crate::special_forms;
use crate::types::{Arity, Atom, Builtin, Int, Value};
use std::collections::HashMap;
use std::io::Write;

fn grab_ints(args: &[Atom], ctx: &mut Context) -> evaluator::Result<Vec<Int>> {
    args.iter()
        .map(|arg| -> evaluator::Result<Int> { Ok(eval(arg, ctx)?.as_int()?) })
        .collect()
}

static SUM: Builtin = Builtin {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::at_least(1),
};

fn sum_(args: &[Atom], ctx: &mut Context) -> evaluator::Result {
    let value = grab_ints(args, ctx)?
        .iter()
        .fold(0 as Int, |acc, &x| acc.wrapping_add(x));
    Ok(Value::Integer(value))
}

static SUB: Builtin = Builtin {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::at_least(1),
};

fn sub_(args: &[Atom], ctx: &mut Context) -> evaluator::Result {
    let ints = grab_ints(args, ctx)?;
    let value = ints[1..]
        .iter()
        .fold(ints[0], |acc, &x| acc.wrapping_sub(x));
    Ok(Value::Integer(value))
}

static MUL: Builtin = Builtin {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::at_least(1),
};

fn mul_(args: &[Atom], ctx: &mut Context) -> evaluator::Result {
    let value = grab_ints(args, ctx)?
        .iter()
        .fold(1 as Int, |acc, &x| acc.wrapping_mul(x));
    Ok(Value::Integer(value))
}

static DIV: Builtin = Builtin {
    name: "/",
    fn_ptr: div_,
    arity: Arity::at_least(1),
};

// Divides as it goes: operands after a zero divisor are never evaluated.
fn div_(args: &[Atom], ctx: &mut Context) -> evaluator::Result {
    let mut value = eval(&args[0], ctx)?.as_int()?;
    for arg in &args[1..] {
        let divisor = eval(arg, ctx)?.as_int()?;
        if divisor == 0 {
            return Err(evaluator::Error::DivisionByZero);
        }
        value = value.wrapping_div(divisor);
    }
    Ok(Value::Integer(value))
}

fn comparison_(
    args: &[Atom],
    ctx: &mut Context,
    comp: fn(&Int, &Int) -> bool,
) -> evaluator::Result {
    match grab_ints(args, ctx)?.as_slice() {
        [x, y] => Ok(Value::Bool(comp(x, y))),
        _ => unreachable!(),
    }
}

macro_rules! comparison_builtin {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            static $NAME: Builtin = Builtin {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[Atom], ctx: &mut Context| {
                    comparison_(args, ctx, Int:: [<$NAME:lower>])
                },
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_builtin!(<, LT);
comparison_builtin!(<=, LE);
comparison_builtin!(>, GT);
comparison_builtin!(>=, GE);

static EQUAL: Builtin = Builtin {
    name: "=",
    fn_ptr: |args, ctx| Ok(Value::Bool(eval(&args[0], ctx)? == eval(&args[1], ctx)?)),
    arity: Arity::exactly(2),
};

static NOT_EQUAL: Builtin = Builtin {
    name: "!=",
    fn_ptr: |args, ctx| Ok(Value::Bool(eval(&args[0], ctx)? != eval(&args[1], ctx)?)),
    arity: Arity::exactly(2),
};

static PRINT: Builtin = Builtin {
    name: "print",
    fn_ptr: print_,
    arity: Arity::at_least(0),
};

// Values are written back to back, with no separator.
fn print_(args: &[Atom], ctx: &mut Context) -> evaluator::Result {
    for arg in args {
        let value = eval(arg, ctx)?;
        write!(ctx.output, "{}", value)?;
    }
    writeln!(ctx.output)?;
    ctx.output.flush()?;
    Ok(Value::Nil)
}

static DO: Builtin = Builtin {
    name: "do",
    fn_ptr: special_forms::apply_do,
    arity: Arity::at_least(0),
};

static SET: Builtin = Builtin {
    name: "set",
    fn_ptr: special_forms::apply_set,
    arity: Arity::exactly(2),
};

static IF: Builtin = Builtin {
    name: "if",
    fn_ptr: special_forms::apply_if,
    arity: Arity::exactly(3),
};

static AND: Builtin = Builtin {
    name: "and",
    fn_ptr: special_forms::apply_and,
    arity: Arity::at_least(0),
};

static OR: Builtin = Builtin {
    name: "or",
    fn_ptr: special_forms::apply_or,
    arity: Arity::at_least(0),
};

static NOT: Builtin = Builtin {
    name: "not",
    fn_ptr: special_forms::apply_not,
    arity: Arity::exactly(1),
};

static INCR: Builtin = Builtin {
    name: "incr",
    fn_ptr: special_forms::apply_incr,
    arity: Arity::exactly(1),
};

static DECR: Builtin = Builtin {
    name: "decr",
    fn_ptr: special_forms::apply_decr,
    arity: Arity::exactly(1),
};

static FOR: Builtin = Builtin {
    name: "for",
    fn_ptr: special_forms::apply_for,
    arity: Arity::exactly(4),
};

static LAMBDA: Builtin = Builtin {
    name: "lambda",
    fn_ptr: special_forms::apply_lambda,
    arity: Arity::exactly(2),
};

static MACRO: Builtin = Builtin {
    name: "macro",
    fn_ptr: special_forms::apply_macro,
    arity: Arity::exactly(2),
};

static EVAL: Builtin = Builtin {
    name: "eval",
    fn_ptr: special_forms::apply_eval,
    arity: Arity::exactly(1),
};

type Namespace = HashMap<&'static str, &'static Builtin>;
lazy_static! {
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for &func in [
            // Arithmetic
            &SUM,
            &SUB,
            &MUL,
            &DIV,
            // Comparisons
            &EQUAL,
            &NOT_EQUAL,
            &LT,
            &LE,
            &GT,
            &GE,
            // Control flow
            &DO,
            &IF,
            &AND,
            &OR,
            &NOT,
            &FOR,
            // Bindings
            &SET,
            &INCR,
            &DECR,
            // Closures and staging
            &LAMBDA,
            &MACRO,
            &EVAL,
            // Other
            &PRINT,
        ].iter() {
            map.insert(func.name, func);
        }
        map
    };
}
