use crate::types::{Atom, Closure, Value};
use itertools::Itertools;
use std::fmt;

pub fn pr_str(value: &Value) -> String {
    value.to_string()
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Number(n) => write!(f, "{}", n),
            Atom::Symbol(s) => write!(f, "{}", s.0),
            Atom::List(elements) => write!(f, "({})", elements.iter().join(" ")),
            Atom::Quoted(inner) => write!(f, "'{}", inner),
        }
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#<{} ({})>",
            self.kind(),
            self.parameters.iter().map(|p| &p.0).join(" ")
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Atom(atom) => write!(f, "{}", atom),
            Value::Builtin(func) => write!(f, "#<builtin {}>", func.name),
            Value::Closure(closure) => write!(f, "{}", closure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn atoms_print_as_source() {
        let atom = Atom::wrap_list(vec![
            Atom::new_symbol("+"),
            Atom::Number(1),
            Atom::quote(Atom::wrap_list(vec![Atom::new_symbol("f")])),
        ]);
        assert_eq!(atom.to_string(), "(+ 1 '(f))");
        assert_eq!(Atom::wrap_list(vec![]).to_string(), "()");
    }

    #[test]
    fn values_print_plainly() {
        assert_eq!(pr_str(&Value::Integer(-3)), "-3");
        assert_eq!(pr_str(&Value::Bool(true)), "true");
        assert_eq!(pr_str(&Value::Bool(false)), "false");
        assert_eq!(pr_str(&Value::Nil), "nil");
        assert_eq!(pr_str(&Value::Atom(Atom::new_symbol("x"))), "x");
    }

    #[test]
    fn closures_show_their_parameters() {
        let closure = Closure {
            parameters: vec!["a".into(), "b".into()],
            body: Atom::Number(0),
            is_macro: true,
        };
        assert_eq!(pr_str(&Value::Closure(Rc::new(closure))), "#<macro (a b)>");
    }
}
