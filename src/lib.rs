// ABOUTME: Library root exposing the interpreter's modules for the binary and tests

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use std::rc::Rc;

use env::Environment;
use value::Value;

/// Parse and evaluate `source` against a fresh global environment.
/// Returns the parser's error list on the left if parsing failed (the
/// program is never evaluated in that case).
pub fn run(source: &str) -> Result<Value, Vec<String>> {
    let (program, errors) = parser::parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    let env = Environment::new();
    Ok(eval::eval_program(&program, &env))
}

/// Same as `run`, but against a caller-supplied environment — used by the
/// REPL to keep bindings alive across lines.
pub fn run_in(source: &str, env: &Rc<Environment>) -> Result<Value, Vec<String>> {
    let (program, errors) = parser::parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(eval::eval_program(&program, env))
}
