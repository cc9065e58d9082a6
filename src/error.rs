// ABOUTME: Typed error constructors for evaluator messages and driver I/O failures

use thiserror::Error;

/// Message-template constructors for the language's own runtime errors.
///
/// `EvalError` is never threaded through a `Result` across evaluation calls —
/// the evaluator converts one to `Value::Error(err.to_string())` at the exact
/// point it's raised and nothing upstream ever sees this type. It exists only
/// so every raise site in `eval.rs` builds its message the same, typo-free
/// way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: String,
        operator: String,
        right: String,
    },

    #[error("Unknown operator: {operator}{operand}")]
    UnknownPrefixOperator { operator: String, operand: String },

    #[error("Unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: String,
        operator: String,
        right: String,
    },

    #[error("Identifier not found: {name}")]
    IdentifierNotFound { name: String },

    #[error("Builtin \"{name}\": wrong number of args. got={got}, expected={expected}")]
    Arity {
        name: String,
        got: usize,
        expected: String,
    },

    #[error("Builtin \"{name}\" doesn't take {kind} args")]
    WrongArgType { name: String, kind: String },

    #[error("Unusable as hashkey: {kind}")]
    UnusableHashKey { kind: String },

    #[error("{inspected} isn't a function (user defined or builtin).")]
    NotCallable { inspected: String },

    #[error("Error: missing args to the function: {name}")]
    FunctionArity { name: String },

    #[error("Index operator not supported: {kind}")]
    IndexNotSupported { kind: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown concat operator: '{operator}', use +")]
    UnknownConcatOperator { operator: String },

    #[error("Integer overflow: {left} {operator} {right}")]
    IntegerOverflow {
        left: i64,
        operator: String,
        right: i64,
    },
}

impl EvalError {
    pub fn type_mismatch(
        left: impl Into<String>,
        operator: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        EvalError::TypeMismatch {
            left: left.into(),
            operator: operator.into(),
            right: right.into(),
        }
    }

    pub fn unknown_prefix_operator(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        EvalError::UnknownPrefixOperator {
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    pub fn unknown_operator(
        left: impl Into<String>,
        operator: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        EvalError::UnknownInfixOperator {
            left: left.into(),
            operator: operator.into(),
            right: right.into(),
        }
    }

    pub fn unknown_concat_operator(operator: impl Into<String>) -> Self {
        EvalError::UnknownConcatOperator {
            operator: operator.into(),
        }
    }

    pub fn identifier_not_found(name: impl Into<String>) -> Self {
        EvalError::IdentifierNotFound { name: name.into() }
    }

    pub fn arity(name: impl Into<String>, got: usize, expected: impl Into<String>) -> Self {
        EvalError::Arity {
            name: name.into(),
            got,
            expected: expected.into(),
        }
    }

    pub fn wrong_arg_type(name: impl Into<String>, kind: impl Into<String>) -> Self {
        EvalError::WrongArgType {
            name: name.into(),
            kind: kind.into(),
        }
    }

    pub fn unusable_hash_key(kind: impl Into<String>) -> Self {
        EvalError::UnusableHashKey { kind: kind.into() }
    }

    pub fn not_callable(inspected: impl Into<String>) -> Self {
        EvalError::NotCallable {
            inspected: inspected.into(),
        }
    }

    pub fn function_arity(name: impl Into<String>) -> Self {
        EvalError::FunctionArity { name: name.into() }
    }

    pub fn index_not_supported(kind: impl Into<String>) -> Self {
        EvalError::IndexNotSupported { kind: kind.into() }
    }

    pub fn division_by_zero() -> Self {
        EvalError::DivisionByZero
    }

    pub fn integer_overflow(left: i64, operator: impl Into<String>, right: i64) -> Self {
        EvalError::IntegerOverflow {
            left,
            operator: operator.into(),
            right,
        }
    }
}

/// Failures belonging to the driver (CLI/REPL), never the language itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read script file {path}: {source}")]
    ReadScript {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not load REPL history: {0}")]
    History(#[source] std::io::Error),

    #[error("parse error")]
    Parse(Vec<String>),
}
