//! Interpreter state: scopes, expression evaluation, execution results.

mod eval;
mod result;
mod scope;

pub use eval::{eval_expr, interpolate, lookup, EvalError};
pub use result::ExecResult;
pub use scope::Scope;
