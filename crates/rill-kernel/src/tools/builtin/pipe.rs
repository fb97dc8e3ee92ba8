//! pipe — Create a shared pipe.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Pipe tool: create a shared pipe and return its handle.
///
/// The handle is carried as structured data, so `P=$(pipe)` stores a
/// real pipe value that method stages can act on.
pub struct Pipe;

#[async_trait]
impl Tool for Pipe {
    fn name(&self) -> &str {
        "pipe"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("pipe", "Create a shared pipe and return its handle")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let (id, _) = ctx.pipes.create();
        ExecResult::success_with_data(format!("{}\n", id), Value::Pipe(id))
    }
}
