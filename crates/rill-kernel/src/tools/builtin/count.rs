//! count — Count lines from stdin.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Count tool: number of input lines.
pub struct Count;

#[async_trait]
impl Tool for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("count", "Count lines from stdin")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let input = ctx.take_stdin().unwrap_or_default();
        let n = input.lines().count() as i64;
        ExecResult::success_with_data(format!("{}\n", n), Value::Int(n))
    }
}
