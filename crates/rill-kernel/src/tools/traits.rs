//! The Tool trait and its argument/schema types.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;

use super::context::ExecContext;

/// A command implementation.
///
/// Tools receive already-evaluated arguments and an execution context,
/// and report everything through [`ExecResult`] — a tool never panics
/// on bad input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name this tool is invoked by.
    fn name(&self) -> &str;

    /// Schema describing parameters, for `help` and introspection.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool.
    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult;
}

/// Evaluated arguments for a tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Positional values in order.
    pub positional: Vec<Value>,
    /// Named `key=value` arguments.
    pub named: HashMap<String, Value>,
    /// Flags from `-x` and `--long`.
    pub flags: HashSet<String>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a positional argument by index.
    pub fn get_positional(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Get a named argument.
    pub fn get_named(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    /// Get a named argument as a string.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.named.get(key).map(|v| v.to_string())
    }

    /// Get a named argument as an integer, if it is one (or parses as
    /// one).
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.named.get(key)? {
            Value::Int(i) => Some(*i),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Check whether a flag was passed.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

/// Schema for one tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSchema {
    pub name: String,
    pub type_name: String,
    pub required: bool,
    pub default: Value,
    pub description: String,
}

impl ParamSchema {
    pub fn required(
        name: impl Into<String>,
        type_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: true,
            default: Value::Null,
            description: description.into(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: Value,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            default,
            description: description.into(),
        }
    }
}

/// Schema for a tool.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSchema>,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamSchema) -> Self {
        self.params.push(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_args_accessors() {
        let mut args = ToolArgs::new();
        args.positional.push(Value::Int(5));
        args.named.insert("n".into(), Value::Int(3));
        args.named.insert("sep".into(), Value::String("7".into()));
        args.flags.insert("cleanup".into());

        assert_eq!(args.get_positional(0), Some(&Value::Int(5)));
        assert_eq!(args.get_positional(1), None);
        assert_eq!(args.get_named("n"), Some(&Value::Int(3)));
        assert_eq!(args.get_int("n"), Some(3));
        assert_eq!(args.get_int("sep"), Some(7));
        assert_eq!(args.get_string("sep"), Some("7".into()));
        assert!(args.has_flag("cleanup"));
        assert!(!args.has_flag("verbose"));
    }

    #[test]
    fn schema_builder() {
        let schema = ToolSchema::new("seq", "Print a sequence of numbers")
            .param(ParamSchema::required("last", "int", "Final number"))
            .param(ParamSchema::optional(
                "sep",
                "string",
                Value::String("\n".into()),
                "Separator",
            ));
        assert_eq!(schema.params.len(), 2);
        assert!(schema.params[0].required);
        assert!(!schema.params[1].required);
    }
}
