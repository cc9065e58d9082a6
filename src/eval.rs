// ABOUTME: Tree-walking evaluator: AST + Environment to Value

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::builtins::lookup_builtin;
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

/// Evaluate a whole program. A `ReturnValue` produced by the last statement
/// is unwrapped here — it must never escape to a caller (I2).
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;

    for stmt in &program.statements {
        result = eval_statement(stmt, env);

        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }

    result
}

/// Evaluate a block, preserving the `ReturnValue` wrapper (unlike
/// `eval_program`) so nested blocks propagate `return` through to the
/// enclosing function or program.
fn eval_block_statement(block: &BlockStatement, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;

    for stmt in &block.statements {
        result = eval_statement(stmt, env);

        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(stmt: &Statement, env: &Rc<Environment>) -> Value {
    match stmt {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.set(name.value.clone(), value);
            Value::Null
        }
        Statement::Return { value, .. } => {
            let value = match value {
                Some(expr) => eval_expression(expr, env),
                None => Value::Null,
            };
            if value.is_error() {
                return value;
            }
            Value::ReturnValue(Box::new(value))
        }
        Statement::Expression { expression, .. } => eval_expression(expression, env),
        Statement::Block(block) => eval_block_statement(block, env),
    }
}

fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Value {
    match expr {
        Expression::IntegerLiteral { value, .. } => Value::Int(*value),
        Expression::StringLiteral { value, .. } => Value::String(value.clone()),
        Expression::BooleanLiteral { value, .. } => Value::Bool(*value),
        Expression::Identifier(ident) => eval_identifier(&ident.value, env),
        Expression::ListLiteral { elements, .. } => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                let value = eval_expression(element, env);
                if value.is_error() {
                    return value;
                }
                values.push(value);
            }
            Value::List(Rc::new(RefCell::new(values)))
        }
        Expression::HashLiteral { pairs, .. } => eval_hash_literal(pairs, env),
        Expression::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, right)
        }
        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => eval_if_expression(condition, consequence, alternative.as_ref(), env),
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Value::Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        },
        Expression::Call {
            function,
            arguments,
            ..
        } => eval_call_expression(function, arguments, env),
        Expression::Index {
            left,
            index,
            assigned_value,
            ..
        } => eval_index_expression(left, index, assigned_value.as_deref(), env),
        Expression::Assign { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.set(name.value.clone(), value.clone());
            value
        }
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = lookup_builtin(name) {
        return builtin;
    }
    Value::Error(EvalError::identifier_not_found(name).to_string())
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Rc<Environment>) -> Value {
    let mut entries = HashMap::new();

    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }
        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }
        let Some(hash_key) = key.hash_key() else {
            return Value::Error(EvalError::unusable_hash_key(key.type_name()).to_string());
        };
        entries.insert(hash_key, (key, value));
    }

    Value::Hashmap(Rc::new(RefCell::new(entries)))
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => Value::Bool(!right.is_truthy()),
        "-" => match right {
            Value::Int(i) => Value::Int(-i),
            other => Value::Error(
                EvalError::unknown_prefix_operator("-", other.type_name()).to_string(),
            ),
        },
        _ => unreachable!("lexer/parser only produce ! and - as prefix operators"),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Int(l), Value::Int(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ if std::mem::discriminant(&left) == std::mem::discriminant(&right) => match operator {
            "==" => Value::Bool(left == right),
            "!=" => Value::Bool(left != right),
            _ => Value::Error(
                EvalError::unknown_operator(left.type_name(), operator, right.type_name())
                    .to_string(),
            ),
        },
        _ => Value::Error(
            EvalError::type_mismatch(left.type_name(), operator, right.type_name()).to_string(),
        ),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => match left.checked_add(right) {
            Some(sum) => Value::Int(sum),
            None => Value::Error(EvalError::integer_overflow(left, "+", right).to_string()),
        },
        "-" => match left.checked_sub(right) {
            Some(diff) => Value::Int(diff),
            None => Value::Error(EvalError::integer_overflow(left, "-", right).to_string()),
        },
        "*" => match left.checked_mul(right) {
            Some(product) => Value::Int(product),
            None => Value::Error(EvalError::integer_overflow(left, "*", right).to_string()),
        },
        "/" => {
            if right == 0 {
                Value::Error(EvalError::division_by_zero().to_string())
            } else {
                Value::Int(left / right)
            }
        }
        "<" => Value::Bool(left < right),
        ">" => Value::Bool(left > right),
        "==" => Value::Bool(left == right),
        "!=" => Value::Bool(left != right),
        _ => Value::Error(EvalError::unknown_operator("INT", operator, "INT").to_string()),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::String(format!("{}{}", left, right)),
        _ => Value::Error(EvalError::unknown_concat_operator(operator).to_string()),
    }
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Rc<Environment>,
) -> Value {
    let condition = eval_expression(condition, env);
    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        eval_block_statement(consequence, env)
    } else if let Some(alternative) = alternative {
        eval_block_statement(alternative, env)
    } else {
        Value::Null
    }
}

fn eval_call_expression(
    function: &Expression,
    arguments: &[Expression],
    env: &Rc<Environment>,
) -> Value {
    let function = eval_expression(function, env);
    if function.is_error() {
        return function;
    }

    let mut args = Vec::with_capacity(arguments.len());
    for arg in arguments {
        let value = eval_expression(arg, env);
        if value.is_error() {
            return value;
        }
        args.push(value);
    }

    apply_function(function, &args)
}

fn apply_function(function: Value, args: &[Value]) -> Value {
    match function {
        Value::Function {
            parameters,
            body,
            env: captured_env,
        } => {
            if parameters.len() != args.len() {
                let params = parameters.iter().map(|p| p.value.clone()).collect::<Vec<_>>().join(", ");
                let name = format!("fn({})", params);
                return Value::Error(EvalError::function_arity(name).to_string());
            }

            let call_env = Environment::new_enclosed(captured_env);
            for (param, arg) in parameters.iter().zip(args) {
                call_env.set(param.value.clone(), arg.clone());
            }

            match eval_block_statement(&body, &call_env) {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(_, function) => function(args),
        other => Value::Error(EvalError::not_callable(other.inspect()).to_string()),
    }
}

fn eval_index_expression(
    left: &Expression,
    index: &Expression,
    assigned_value: Option<&Expression>,
    env: &Rc<Environment>,
) -> Value {
    let left = eval_expression(left, env);
    if left.is_error() {
        return left;
    }

    match &left {
        Value::List(items) => {
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            let Value::Int(i) = index else {
                return Value::Error(
                    EvalError::index_not_supported(left.type_name()).to_string(),
                );
            };

            let new_value = match assigned_value {
                Some(expr) => {
                    let value = eval_expression(expr, env);
                    if value.is_error() {
                        return value;
                    }
                    Some(value)
                }
                None => None,
            };

            let len = items.borrow().len() as i64;
            if i < 0 || i > len - 1 {
                return Value::Null;
            }

            if let Some(value) = new_value {
                items.borrow_mut()[i as usize] = value;
            }
            items.borrow()[i as usize].clone()
        }
        Value::Hashmap(entries) => {
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            let Some(hash_key) = index.hash_key() else {
                return Value::Error(EvalError::unusable_hash_key(index.type_name()).to_string());
            };

            if let Some(expr) = assigned_value {
                let value = eval_expression(expr, env);
                if value.is_error() {
                    return value;
                }
                entries
                    .borrow_mut()
                    .insert(hash_key, (index, value.clone()));
                return value;
            }

            entries
                .borrow()
                .get(&hash_key)
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Null)
        }
        other => Value::Error(EvalError::index_not_supported(other.type_name()).to_string()),
    }
}
