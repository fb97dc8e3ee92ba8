//! Synchronous expression evaluation.
//!
//! Everything except command substitution can be evaluated against a
//! scope without running anything. Command substitution needs the
//! kernel (it executes a pipeline), so [`eval_expr`] returns `None` for
//! it and the kernel handles that case asynchronously.

use thiserror::Error;

use crate::ast::{Expr, StringPart, Value};

use super::scope::Scope;

/// Errors from evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
}

/// Look up a variable, including the special `?`.
pub fn lookup(scope: &Scope, name: &str) -> Result<Value, EvalError> {
    scope
        .resolve(name)
        .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
}

/// Render an interpolated string. Undefined variables render as empty,
/// matching shell behavior.
pub fn interpolate(parts: &[StringPart], scope: &Scope) -> String {
    let mut out = String::new();
    for part in parts {
        match part {
            StringPart::Literal(s) => out.push_str(s),
            StringPart::Var(name) => {
                if let Some(value) = scope.resolve(name) {
                    out.push_str(&value.to_string());
                }
            }
        }
    }
    out
}

/// Evaluate an expression against a scope.
///
/// Returns `Ok(None)` for command substitution, which only the kernel
/// can evaluate.
pub fn eval_expr(expr: &Expr, scope: &Scope) -> Result<Option<Value>, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(Some(value.clone())),
        Expr::VarRef(name) => lookup(scope, name).map(Some),
        Expr::Interpolated(parts) => Ok(Some(Value::String(interpolate(parts, scope)))),
        Expr::CommandSubst(_) => Ok(None),
    }
}
