//! fg — Bring a background job to the foreground.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::scheduler::JobId;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Fg tool: wait for a background job and forward its result.
///
/// The job's captured stdout, stderr, exit code, and data become this
/// command's result, as if the pipeline had run in the foreground.
pub struct Fg;

#[async_trait]
impl Tool for Fg {
    fn name(&self) -> &str {
        "fg"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("fg", "Wait for a background job and forward its result").param(
            ParamSchema::required("job", "job", "Job handle or id to wait for"),
        )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let id = match args.get_positional(0) {
            Some(Value::Job(id)) => *id,
            Some(Value::Int(i)) if *i > 0 => JobId(*i as u64),
            Some(Value::String(s)) => match s.trim_matches(['[', ']']).parse::<u64>() {
                Ok(i) => JobId(i),
                Err(_) => return ExecResult::failure(1, format!("fg: invalid job id: {}", s)),
            },
            Some(other) => {
                return ExecResult::failure(1, format!("fg: invalid job id: {}", other))
            }
            None => return ExecResult::failure(2, "fg: usage: fg JOB"),
        };

        match ctx.jobs.wait(id).await {
            Some(result) => result,
            None => ExecResult::failure(1, format!("fg: no such job: {}", id)),
        }
    }
}
