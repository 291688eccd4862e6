use crate::evaluator;
use crate::evaluator::Context;
use derive_more::Deref;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

#[derive(Deref, Debug, PartialEq, Eq)]
pub struct AtomList(pub Vec<Atom>);

/// Source code and quoted data share this one representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Number(Int),
    Symbol(Symbol),
    List(Rc<AtomList>),
    Quoted(Rc<Atom>),
}

impl Atom {
    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(name.into())
    }

    pub fn wrap_list(elements: Vec<Atom>) -> Self {
        Self::List(Rc::new(AtomList(elements)))
    }

    pub fn quote(inner: Atom) -> Self {
        Self::Quoted(Rc::new(inner))
    }

    pub(crate) fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Atom::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol),
        }
    }

    pub(crate) fn as_list(&self) -> Result<&[Atom], TypeMismatch> {
        match self {
            Atom::List(list) => Ok(list),
            _ => Err(TypeMismatch::NotAList),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    pub(crate) name: &'static str,
    pub(crate) expected: Arity,
    pub(crate) got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// A built-in receives its arguments unevaluated and decides itself whether
/// and when to evaluate each one.
pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Atom], &mut Context) -> evaluator::Result,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin function #<{}>", self.name)
    }
}

/// A user-defined callable. It holds no reference to any environment: calls
/// run against a copy of whatever environment is active at call time.
#[derive(Clone, Debug)]
pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Atom,
    pub is_macro: bool,
}

impl Closure {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.parameters.len())
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self.is_macro {
            true => "macro",
            false => "lambda",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Integer(Int),
    Bool(bool),
    Atom(Atom),
    Builtin(&'static Builtin),
    Closure(Rc<Closure>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum TypeMismatch {
    NotAnInt,
    NotABool,
    NotASymbol,
    NotAList,
    NotAnAtom,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let expected = match self {
            TypeMismatch::NotAnInt => "an integer",
            TypeMismatch::NotABool => "a boolean",
            TypeMismatch::NotASymbol => "a symbol",
            TypeMismatch::NotAList => "a list",
            TypeMismatch::NotAnAtom => "a quoted atom",
        };
        write!(f, "expected {}", expected)
    }
}

impl Value {
    pub(crate) fn as_int(&self) -> Result<Int, TypeMismatch> {
        match self {
            Value::Integer(x) => Ok(*x),
            _ => Err(TypeMismatch::NotAnInt),
        }
    }

    pub(crate) fn as_bool(&self) -> Result<bool, TypeMismatch> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(TypeMismatch::NotABool),
        }
    }

    pub(crate) fn into_atom(self) -> Result<Atom, TypeMismatch> {
        match self {
            Value::Atom(a) => Ok(a),
            _ => Err(TypeMismatch::NotAnAtom),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match [self, other] {
            [Value::Nil, Value::Nil] => true,
            [Value::Integer(x), Value::Integer(y)] => x == y,
            [Value::Bool(x), Value::Bool(y)] => x == y,
            [Value::Atom(x), Value::Atom(y)] => x == y,
            [Value::Builtin(x), Value::Builtin(y)] => x.name == y.name,
            // Closures carry no structure worth comparing: identity only.
            [Value::Closure(x), Value::Closure(y)] => Rc::ptr_eq(x, y),
            [_, _] => false,
        }
    }
}

impl Eq for Value {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms_compare_structurally() {
        let a = Atom::wrap_list(vec![Atom::new_symbol("+"), Atom::Number(1)]);
        let b = Atom::wrap_list(vec![Atom::new_symbol("+"), Atom::Number(1)]);
        assert_eq!(a, b);
        assert_ne!(Atom::quote(a.clone()), a);
    }

    #[test]
    fn values_of_different_kinds_differ() {
        assert_ne!(Value::Integer(1), Value::Bool(true));
        assert_ne!(Value::Nil, Value::Atom(Atom::wrap_list(vec![])));
        assert_eq!(Value::Nil, Value::Nil);
    }

    #[test]
    fn closures_compare_by_identity() {
        let closure = Rc::new(Closure {
            parameters: vec![],
            body: Atom::Number(1),
            is_macro: false,
        });
        let twin = Rc::new((*closure).clone());
        assert_eq!(
            Value::Closure(closure.clone()),
            Value::Closure(closure.clone())
        );
        assert_ne!(Value::Closure(closure), Value::Closure(twin));
    }

    #[test]
    fn arity_reports_violations() {
        assert!(Arity::exactly(2).validate_for(2, "=").is_ok());
        assert!(Arity::at_least(1).validate_for(0, "+").is_err());
        let err = Arity::exactly(3).validate_for(1, "if").unwrap_err();
        assert_eq!(
            err.to_string(),
            "When evaluating if expected exactly 3 arguments, but received 1 arguments"
        );
    }
}
