// ABOUTME: Environment module for managing variable bindings and lexical scopes

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A binding scope with an optional outward pointer to an enclosing scope.
/// Lookup searches the current scope then walks outward; writes always land
/// in the current scope (see `set`).
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Fresh empty environment with no outer scope — used for the program's
    /// global scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Fresh empty environment enclosed by `outer`. Every function call
    /// creates exactly one of these, chained off the function's *captured*
    /// environment rather than the caller's — the closure contract.
    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Search this scope, then outward, returning a clone of the bound value.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(outer) = &self.outer {
            return outer.get(name);
        }
        None
    }

    /// Write into this scope only — never walks outward, even if `name` is
    /// already bound further out. Used for both `let` and `AssignExpression`.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }
}
