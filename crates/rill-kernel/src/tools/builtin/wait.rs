//! wait — Wait for background jobs to complete.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::scheduler::JobId;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Wait tool: wait for one job, or all of them.
///
/// Unlike `fg`, this reports completion status rather than forwarding
/// the job's output.
pub struct Wait;

#[async_trait]
impl Tool for Wait {
    fn name(&self) -> &str {
        "wait"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("wait", "Wait for background jobs to complete").param(
            ParamSchema::optional(
                "job",
                "job",
                Value::Null,
                "Specific job to wait for (waits for all if not given)",
            ),
        )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if let Some(value) = args.get_positional(0) {
            let id = match value {
                Value::Job(id) => *id,
                Value::Int(i) if *i > 0 => JobId(*i as u64),
                Value::String(s) => match s.trim_matches(['[', ']']).parse::<u64>() {
                    Ok(i) => JobId(i),
                    Err(_) => {
                        return ExecResult::failure(1, format!("wait: invalid job id: {}", s))
                    }
                },
                other => {
                    return ExecResult::failure(1, format!("wait: invalid job id: {}", other))
                }
            };

            return match ctx.jobs.wait(id).await {
                Some(result) => {
                    let status = if result.ok() { "Done" } else { "Failed" };
                    ExecResult::success(format!("[{}] {}\n", id, status))
                }
                None => ExecResult::failure(1, format!("wait: no such job: {}", id)),
            };
        }

        let results = ctx.jobs.wait_all().await;
        if results.is_empty() {
            return ExecResult::success("(no jobs to wait for)\n");
        }

        let mut out = String::new();
        let mut any_failed = false;
        for (id, result) in results {
            let status = if result.ok() {
                "Done"
            } else {
                any_failed = true;
                "Failed"
            };
            out.push_str(&format!("[{}] {}\n", id, status));
        }

        if any_failed {
            ExecResult::from_output(1, out, "")
        } else {
            ExecResult::success(out)
        }
    }
}
