// ABOUTME: Fixed name-to-builtin table consulted by identifier resolution fallback

use crate::error::EvalError;
use crate::value::Value;

/// Look up `name` in the built-in table. Consulted only after the
/// environment chain comes up empty, so user code can shadow any of these
/// (P7).
pub fn lookup_builtin(name: &str) -> Option<Value> {
    match name {
        "len" => Some(Value::Builtin("len", len)),
        "puts" => Some(Value::Builtin("puts", puts)),
        "exit" => Some(Value::Builtin("exit", exit)),
        _ => None,
    }
}

fn len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(EvalError::arity("len", args.len(), "1").to_string());
    }

    match &args[0] {
        Value::String(s) => Value::Int(s.len() as i64),
        Value::List(items) => Value::Int(items.borrow().len() as i64),
        other => Value::Error(EvalError::wrong_arg_type("len", other.type_name()).to_string()),
    }
}

fn puts(args: &[Value]) -> Value {
    for arg in args {
        println!("{}", arg.inspect());
    }
    Value::Null
}

fn exit(args: &[Value]) -> Value {
    match args.len() {
        0 => std::process::exit(0),
        1 => match &args[0] {
            Value::Int(code) => std::process::exit(*code as i32),
            other => Value::Error(EvalError::wrong_arg_type("exit", other.type_name()).to_string()),
        },
        n => Value::Error(EvalError::arity("exit", n, "0-1").to_string()),
    }
}
