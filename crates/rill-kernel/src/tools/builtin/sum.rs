//! sum — Sum integer lines from stdin.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Sum tool: add up one integer per input line.
///
/// Blank lines are skipped; anything else that does not parse as an
/// integer is an error. An empty input sums to 0.
pub struct Sum;

#[async_trait]
impl Tool for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("sum", "Sum integer lines from stdin")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let input = ctx.take_stdin().unwrap_or_default();

        let mut total: i64 = 0;
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<i64>() {
                Ok(n) => match total.checked_add(n) {
                    Some(t) => total = t,
                    None => return ExecResult::failure(1, "sum: integer overflow"),
                },
                Err(_) => {
                    return ExecResult::failure(1, format!("sum: invalid number: {}", line))
                }
            }
        }

        ExecResult::success_with_data(format!("{}\n", total), Value::Int(total))
    }
}
