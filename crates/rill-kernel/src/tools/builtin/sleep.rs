//! sleep — Pause for a duration.

use std::time::Duration;

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Sleep tool: wait for the given number of seconds.
pub struct Sleep;

#[async_trait]
impl Tool for Sleep {
    fn name(&self) -> &str {
        "sleep"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("sleep", "Pause for a number of seconds")
            .param(ParamSchema::required("seconds", "float", "How long to sleep"))
    }

    async fn execute(&self, args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        let seconds = match args.get_positional(0) {
            Some(Value::Int(i)) if *i >= 0 => *i as f64,
            Some(Value::Float(f)) if *f >= 0.0 => *f,
            Some(Value::String(s)) => match s.parse::<f64>() {
                Ok(f) if f >= 0.0 => f,
                _ => return ExecResult::failure(1, format!("sleep: invalid duration: {}", s)),
            },
            Some(other) => {
                return ExecResult::failure(1, format!("sleep: invalid duration: {}", other))
            }
            None => return ExecResult::failure(2, "sleep: usage: sleep SECONDS"),
        };

        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
        ExecResult::success("")
    }
}
