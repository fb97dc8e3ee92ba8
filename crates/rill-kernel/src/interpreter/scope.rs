//! Variable scope for the kernel.
//!
//! A flat name-to-value map plus the special `$?` variable tracking the
//! last command result. Background jobs run against a snapshot clone;
//! their assignments (there are none in practice) do not flow back.

use std::collections::HashMap;

use crate::ast::Value;

use super::result::ExecResult;

/// Variable bindings with last-result tracking.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: HashMap<String, Value>,
    last_result: ExecResult,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Remove a variable, returning its value if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    /// Check if a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Set the last command result (accessible via `$?`).
    pub fn set_last_result(&mut self, result: ExecResult) {
        self.last_result = result;
    }

    /// Get the last command result.
    pub fn last_result(&self) -> &ExecResult {
        &self.last_result
    }

    /// Resolve a variable name, including the special `?`.
    ///
    /// `$?` resolves to the last exit code as an integer.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        if name == "?" {
            return self.last_result.get_field("code");
        }
        self.get(name).cloned()
    }

    /// All variables as sorted (name, value) pairs, for introspection.
    pub fn all(&self) -> Vec<(String, Value)> {
        let mut pairs: Vec<_> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_variable() {
        let mut scope = Scope::new();
        scope.set("X", Value::Int(42));
        assert_eq!(scope.get("X"), Some(&Value::Int(42)));
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let scope = Scope::new();
        assert_eq!(scope.get("MISSING"), None);
        assert!(!scope.contains("MISSING"));
    }

    #[test]
    fn remove_returns_value() {
        let mut scope = Scope::new();
        scope.set("X", Value::Int(1));
        assert_eq!(scope.remove("X"), Some(Value::Int(1)));
        assert_eq!(scope.remove("X"), None);
    }

    #[test]
    fn resolve_last_status() {
        let mut scope = Scope::new();
        assert_eq!(scope.resolve("?"), Some(Value::Int(0)));
        scope.set_last_result(ExecResult::failure(127, "not found"));
        assert_eq!(scope.resolve("?"), Some(Value::Int(127)));
    }

    #[test]
    fn all_is_sorted() {
        let mut scope = Scope::new();
        scope.set("B", Value::Int(2));
        scope.set("A", Value::Int(1));
        let all = scope.all();
        assert_eq!(all[0].0, "A");
        assert_eq!(all[1].0, "B");
    }
}
