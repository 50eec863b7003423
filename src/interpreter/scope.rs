// File: src/interpreter/scope.rs
//
// Chained variable scopes for the Yat evaluator.
// Each scope owns its local bindings and borrows its parent, so a parent
// always outlives the children that read through it.

use super::value::Value;
use crate::errors::{find_closest_match, YatError, YatResult};
use std::collections::HashMap;

/// Variable storage with fall-through reads and local-only writes
///
/// A lookup searches the local bindings first and then walks the parent
/// chain. A write always lands in the local bindings, so a child can shadow
/// a parent's name but never change the parent's binding.
///
/// # Examples
///
/// ```
/// use yat::interpreter::{Scope, Value};
///
/// let mut global = Scope::new();
/// global.set("x", Value::Number(10));
///
/// let mut call = Scope::with_parent(&global);
/// call.set("x", Value::Number(20));               // shadows outer x
/// assert_eq!(call.get("x").unwrap(), Value::Number(20));
///
/// drop(call);
/// assert_eq!(global.get("x").unwrap(), Value::Number(10));
/// ```
#[derive(Debug, Default)]
pub struct Scope<'p> {
    vars: HashMap<String, Value>,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    /// Create a root scope with no parent
    pub fn new() -> Self {
        Scope {
            vars: HashMap::new(),
            parent: None,
        }
    }

    /// Create a scope whose reads fall through to `parent`
    pub fn with_parent(parent: &'p Scope<'p>) -> Self {
        Scope {
            vars: HashMap::new(),
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&'p Scope<'p>> {
        self.parent
    }

    /// Find a binding, searching from this scope outward
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(value) = scope.vars.get(name) {
                return Some(value);
            }
            current = scope.parent;
        }
        None
    }

    /// Get a binding or fail with `NotFound(name)`
    pub fn get(&self, name: &str) -> YatResult<Value> {
        match self.lookup(name) {
            Some(value) => Ok(value.clone()),
            None => {
                let mut err = YatError::not_found(name);
                if let Some(candidate) = find_closest_match(name, &self.visible_names()) {
                    err = err.with_suggestion(candidate.to_string());
                }
                Err(Box::new(err))
            }
        }
    }

    /// Bind `name` in this scope, overwriting any local binding
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Every name reachable from this scope, innermost first, without duplicates
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            let mut local: Vec<&String> = scope.vars.keys().collect();
            local.sort();
            for name in local {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            current = scope.parent;
        }
        names
    }

    /// Number of ancestors above this scope
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent;
        }
        depth
    }
}
