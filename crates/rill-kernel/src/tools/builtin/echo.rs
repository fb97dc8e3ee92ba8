//! echo — Print arguments.

use async_trait::async_trait;

use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};
use crate::ast::Value;

/// Echo tool: print arguments separated by spaces.
pub struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("echo", "Print arguments separated by spaces").param(ParamSchema::optional(
            "n",
            "flag",
            Value::Bool(false),
            "Do not print the trailing newline",
        ))
    }

    async fn execute(&self, args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        let text = args
            .positional
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        if args.has_flag("n") {
            ExecResult::success(text)
        } else {
            ExecResult::success(format!("{}\n", text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_util::make_ctx;

    #[tokio::test]
    async fn joins_arguments_with_spaces() {
        let mut ctx = make_ctx();
        let mut args = ToolArgs::new();
        args.positional.push(Value::String("hello".into()));
        args.positional.push(Value::Int(42));

        let result = Echo.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "hello 42\n");
    }

    #[tokio::test]
    async fn no_args_prints_empty_line() {
        let mut ctx = make_ctx();
        let result = Echo.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(result.out, "\n");
    }

    #[tokio::test]
    async fn n_flag_suppresses_newline() {
        let mut ctx = make_ctx();
        let mut args = ToolArgs::new();
        args.positional.push(Value::String("raw".into()));
        args.flags.insert("n".into());

        let result = Echo.execute(args, &mut ctx).await;
        assert_eq!(result.out, "raw");
    }
}
