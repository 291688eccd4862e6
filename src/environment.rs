use crate::builtins;
use crate::types::{Symbol, Value};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

pub type Bindings = HashMap<Symbol, Value>;

/// The active bindings, plus the bindings that were active before each
/// call still in progress.
///
/// A call works on a full copy of the caller's bindings. Whatever the call
/// does to that copy is thrown away when the caller's bindings are restored.
pub struct Environment {
    active: Bindings,
    saved: Vec<Bindings>,
}

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

impl Environment {
    /// An environment with no bindings at all, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            active: Bindings::new(),
            saved: Vec::new(),
        }
    }

    pub fn set<T>(&mut self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        self.active.insert(key.into(), value)
    }

    pub fn get(&self, key: &Symbol) -> Option<&Value> {
        self.active.get(key)
    }

    pub fn fetch(&self, key: &Symbol) -> Result<Value, UnknownSymbol> {
        self.get(key)
            .cloned()
            .ok_or_else(|| UnknownSymbol(key.clone()))
    }

    /// Saves the active bindings and installs a copy of them.
    pub(crate) fn snapshot(&mut self) {
        let copy = self.active.clone();
        self.saved.push(std::mem::replace(&mut self.active, copy));
    }

    /// Reinstates the bindings saved by the matching [`snapshot`](Self::snapshot).
    pub(crate) fn restore(&mut self) {
        match self.saved.pop() {
            Some(previous) => self.active = previous,
            None => log::error!("restore called with no saved bindings"),
        }
    }

    /// Keeps the active bindings and forgets the matching snapshot.
    pub(crate) fn commit(&mut self) {
        if self.saved.pop().is_none() {
            log::error!("commit called with no saved bindings");
        }
    }

    /// Number of snapshots currently saved, i.e. calls in progress.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        let mut env = Self::empty();
        for (&name, &func) in builtins::CORE.iter() {
            env.set(name, Value::Builtin(func));
        }
        env.set(":true", Value::Bool(true));
        env.set(":false", Value::Bool(false));
        env
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user_bindings = self
            .active
            .iter()
            .filter(|(_, value)| !matches!(value, Value::Builtin(_)))
            .sorted_by(|(a, _), (b, _)| a.0.cmp(&b.0))
            .map(|(key, value)| format!("{}: {}", key.0, value))
            .join(", ");
        write!(f, "Environment{{depth: {}, {}}}", self.depth(), user_bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Symbol {
        Symbol::from("x")
    }

    #[test]
    fn default_has_builtins_and_booleans() {
        let env = Environment::default();
        assert!(matches!(env.get(&"+".into()), Some(Value::Builtin(_))));
        assert!(matches!(env.get(&"lambda".into()), Some(Value::Builtin(_))));
        assert_eq!(env.get(&":true".into()), Some(&Value::Bool(true)));
        assert_eq!(env.get(&":false".into()), Some(&Value::Bool(false)));
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn restore_discards_changes_to_existing_bindings() {
        let mut env = Environment::empty();
        env.set("x", Value::Integer(1));
        env.snapshot();
        assert_eq!(env.fetch(&x()).unwrap(), Value::Integer(1));
        env.set("x", Value::Integer(99));
        env.set("y", Value::Integer(2));
        assert_eq!(env.depth(), 1);
        env.restore();
        assert_eq!(env.fetch(&x()).unwrap(), Value::Integer(1));
        assert!(env.get(&"y".into()).is_none());
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn snapshots_nest() {
        let mut env = Environment::empty();
        env.set("x", Value::Integer(0));
        env.snapshot();
        env.set("x", Value::Integer(1));
        env.snapshot();
        env.set("x", Value::Integer(2));
        env.restore();
        assert_eq!(env.fetch(&x()).unwrap(), Value::Integer(1));
        env.restore();
        assert_eq!(env.fetch(&x()).unwrap(), Value::Integer(0));
    }

    #[test]
    fn commit_keeps_changes() {
        let mut env = Environment::empty();
        env.snapshot();
        env.set("x", Value::Integer(5));
        env.commit();
        assert_eq!(env.fetch(&x()).unwrap(), Value::Integer(5));
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn display_lists_user_bindings_in_order() {
        let mut env = Environment::default();
        env.set("b", Value::Integer(2));
        env.set("a", Value::Bool(true));
        assert_eq!(
            env.to_string(),
            "Environment{depth: 0, :false: false, :true: true, a: true, b: 2}"
        );
    }

    #[test]
    fn fetch_reports_unknown_symbols() {
        let env = Environment::empty();
        let UnknownSymbol(missing) = env.fetch(&x()).unwrap_err();
        assert_eq!(missing, x());
    }
}
