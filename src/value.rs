// ABOUTME: Runtime value types produced and consumed by the evaluator

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{BlockStatement, Identifier};
use crate::env::Environment;

/// A kind-tagged 64-bit value used to index `Hashmap` entries. Derived only
/// from `Int`, `Bool`, or `String` values (see `Value::hash_key`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    kind: HashKeyKind,
    value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HashKeyKind {
    Int,
    Bool,
    String,
}

/// A pair of an ordered list of function parameters and its body, closed
/// over the environment active when the `fn` literal was evaluated.
pub type HashEntries = HashMap<HashKey, (Value, Value)>;

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Null,
    List(Rc<RefCell<Vec<Value>>>),
    Hashmap(Rc<RefCell<HashEntries>>),
    Function {
        parameters: Vec<Identifier>,
        body: BlockStatement,
        env: Rc<Environment>,
    },
    Builtin(&'static str, fn(&[Value]) -> Value),
    ReturnValue(Box<Value>),
    Error(String),
}

impl Value {
    /// Name used in error messages (`TYPE mismatch`, `Unknown operator`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "INT",
            Value::Bool(_) => "BOOL",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::List(_) => "LIST",
            Value::Hashmap(_) => "HASH",
            Value::Function { .. } => "FUNCTION",
            Value::Builtin(..) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// Everything but `Null` and `Bool(false)` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// `Some(key)` if this value is hashable (`Int`, `Bool`, `String`), else `None`.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Int(i) => Some(HashKey {
                kind: HashKeyKind::Int,
                value: *i as u64,
            }),
            Value::Bool(b) => Some(HashKey {
                kind: HashKeyKind::Bool,
                value: if *b { 1 } else { 0 },
            }),
            Value::String(s) => Some(HashKey {
                kind: HashKeyKind::String,
                value: fnv1a(s.as_bytes()),
            }),
            _ => None,
        }
    }

    /// User-facing rendering (`puts`, REPL result, CLI script output).
    pub fn inspect(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Null => "Null".to_string(),
            Value::List(items) => {
                let parts: Vec<String> = items.borrow().iter().map(|v| v.inspect()).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Hashmap(entries) => {
                let parts: Vec<String> = entries
                    .borrow()
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Function {
                parameters, body, ..
            } => {
                let parts: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
                format!("fn({}) {{\n{}\n}}", parts.join(", "), body)
            }
            Value::Builtin(..) => "Built-in Function".to_string(),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(msg) => format!("Error: {}", msg),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.inspect())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
