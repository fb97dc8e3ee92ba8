//! jobs — List background jobs.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Jobs tool: list background jobs as `[id] Status command`.
pub struct Jobs;

#[async_trait]
impl Tool for Jobs {
    fn name(&self) -> &str {
        "jobs"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("jobs", "List background jobs").param(ParamSchema::optional(
            "cleanup",
            "flag",
            Value::Bool(false),
            "Remove completed jobs after listing",
        ))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let jobs = ctx.jobs.list().await;

        if args.has_flag("cleanup") {
            ctx.jobs.cleanup().await;
        }

        if jobs.is_empty() {
            return ExecResult::success("(no jobs)\n");
        }

        let mut out = String::new();
        for info in jobs {
            out.push_str(&format!("[{}] {} {}\n", info.id, info.status, info.command));
        }
        ExecResult::success(out)
    }
}
