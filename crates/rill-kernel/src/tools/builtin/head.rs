//! head — First lines of stdin.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

const DEFAULT_LINES: i64 = 10;

/// Head tool: pass through the first `n` lines.
pub struct Head;

#[async_trait]
impl Tool for Head {
    fn name(&self) -> &str {
        "head"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("head", "Print the first lines of stdin").param(ParamSchema::optional(
            "n",
            "int",
            Value::Int(DEFAULT_LINES),
            "Number of lines to keep",
        ))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let n = match args.get_named("n") {
            Some(_) => match args.get_int("n") {
                Some(n) if n >= 0 => n,
                _ => return ExecResult::failure(1, "head: n must be a non-negative integer"),
            },
            None => DEFAULT_LINES,
        };

        let input = ctx.take_stdin().unwrap_or_default();
        let lines: Vec<&str> = input.lines().take(n as usize).collect();

        if lines.is_empty() {
            return ExecResult::success("");
        }
        ExecResult::success(format!("{}\n", lines.join("\n")))
    }
}
