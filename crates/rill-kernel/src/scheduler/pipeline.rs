//! Pipeline execution.
//!
//! Executes a sequence of commands connected by pipes, where the stdout
//! of each command becomes the stdin of the next. Two kinds of stage
//! are handled by the runner itself rather than the tool registry:
//!
//! - pipe method stages (`$P:input`, `$P:output`, `$P:close`), which
//!   need the pipe registry;
//! - a trailing `bg`, which turns the rest of the pipeline into a
//!   background job and returns the job handle immediately.

use std::sync::Arc;

use tracing::debug;

use crate::ast::{Arg, Command, CommandHead, Expr, PipeMethod, Value};
use crate::interpreter::{eval_expr, ExecResult};
use crate::tools::{ExecContext, ToolArgs, ToolRegistry};

/// Runs pipelines against a tool registry.
pub struct PipelineRunner {
    tools: Arc<ToolRegistry>,
}

impl PipelineRunner {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Execute a pipeline of commands.
    ///
    /// Returns the result of the last command, or the first failure.
    /// A pipeline ending in `bg` returns at once with a `Job` handle.
    pub async fn run(&self, commands: &[Command], ctx: &mut ExecContext) -> ExecResult {
        if commands.is_empty() {
            return ExecResult::success("");
        }

        if let Some(idx) = find_bg(commands) {
            if idx != commands.len() - 1 {
                return ExecResult::failure(2, "bg: must be the final stage of a pipeline");
            }
            if commands.len() == 1 {
                return ExecResult::failure(2, "bg: nothing to run in the background");
            }
            if !commands[idx].args.is_empty() {
                return ExecResult::failure(2, "bg: takes no arguments");
            }
            return self.run_background(&commands[..idx], ctx).await;
        }

        run_sequential(&self.tools, commands, ctx).await
    }

    /// Spawn the given commands as a background job and return its handle.
    async fn run_background(&self, commands: &[Command], ctx: &mut ExecContext) -> ExecResult {
        let description = format_pipeline(commands);

        // The job runs against a snapshot of the current context. Pipe
        // and job handles still resolve: the registries are shared.
        let stdin = ctx.take_stdin();
        let mut job_ctx = ctx.clone();
        if let Some(input) = stdin {
            job_ctx.set_stdin(input);
        }

        let tools = Arc::clone(&self.tools);
        let commands = commands.to_vec();
        let id = ctx
            .jobs
            .spawn(description, async move {
                let mut job_ctx = job_ctx;
                run_sequential(&tools, &commands, &mut job_ctx).await
            })
            .await;

        debug!(job = %id, "spawned background pipeline");
        ExecResult::success_with_data(format!("[{}]\n", id), Value::Job(id))
    }
}

/// Run commands sequentially, threading stdout into the next stdin.
async fn run_sequential(
    tools: &Arc<ToolRegistry>,
    commands: &[Command],
    ctx: &mut ExecContext,
) -> ExecResult {
    let mut current_stdin: Option<String> = ctx.take_stdin();
    let mut last_result = ExecResult::success("");

    for (i, cmd) in commands.iter().enumerate() {
        last_result = match &cmd.head {
            CommandHead::Method { target, method } => {
                if !cmd.args.is_empty() {
                    return ExecResult::failure(
                        2,
                        format!("{}:{}: takes no arguments", target, method),
                    );
                }
                run_method(ctx, target, *method, current_stdin.take()).await
            }
            CommandHead::Tool(name) => match name.as_str() {
                "true" => ExecResult::success(""),
                "false" => return ExecResult::failure(1, ""),
                // Only the runner's entry point accepts bg, and only
                // in final position.
                "bg" => {
                    return ExecResult::failure(2, "bg: must be the final stage of a pipeline")
                }
                _ => {
                    let tool = match tools.get(name) {
                        Some(t) => t,
                        None => {
                            return ExecResult::failure(
                                127,
                                format!("{}: command not found", name),
                            );
                        }
                    };

                    let tool_args = match build_tool_args(&cmd.args, ctx) {
                        Ok(a) => a,
                        Err(message) => return ExecResult::failure(1, message),
                    };

                    if let Some(input) = current_stdin.take() {
                        ctx.set_stdin(input);
                    }

                    tool.execute(tool_args, ctx).await
                }
            },
        };

        if !last_result.ok() {
            return last_result;
        }

        if i < commands.len() - 1 {
            current_stdin = Some(last_result.out.clone());
        }
    }

    last_result
}

/// Execute a pipe method stage.
async fn run_method(
    ctx: &mut ExecContext,
    target: &str,
    method: PipeMethod,
    stdin: Option<String>,
) -> ExecResult {
    let value = match ctx.scope.resolve(target) {
        Some(v) => v,
        None => return ExecResult::failure(1, format!("{}: undefined variable", target)),
    };

    let id = match value {
        Value::Pipe(id) => id,
        other => {
            return ExecResult::failure(
                1,
                format!("{}: {} has no method '{}'", target, other.type_name(), method),
            )
        }
    };

    let pipe = match ctx.pipes.get(id) {
        Some(p) => p,
        None => return ExecResult::failure(1, format!("{}: no such pipe: {}", target, id)),
    };

    match method {
        PipeMethod::Output => {
            let input = stdin.unwrap_or_default();
            for line in input.lines() {
                if let Err(e) = pipe.send(line) {
                    return ExecResult::failure(1, format!("{}:output: {}", target, e));
                }
            }
            ExecResult::success("")
        }
        PipeMethod::Input => {
            // Blocks until the pipe is closed; usually runs under bg.
            let mut reader = pipe.subscribe();
            let lines = reader.read_to_end().await;
            let mut out = lines.join("\n");
            if !out.is_empty() {
                out.push('\n');
            }
            ExecResult::success(out)
        }
        PipeMethod::Close => {
            pipe.close();
            ExecResult::success("")
        }
    }
}

/// Find the first `bg` stage, if any.
fn find_bg(commands: &[Command]) -> Option<usize> {
    commands
        .iter()
        .position(|c| matches!(&c.head, CommandHead::Tool(name) if name == "bg"))
}

/// Build ToolArgs from AST args, evaluating expressions against the
/// context's scope.
pub fn build_tool_args(args: &[Arg], ctx: &ExecContext) -> Result<ToolArgs, String> {
    let mut tool_args = ToolArgs::new();

    for arg in args {
        match arg {
            Arg::Positional(expr) => {
                tool_args.positional.push(eval_arg(expr, ctx)?);
            }
            Arg::Named { key, value } => {
                let val = eval_arg(value, ctx)?;
                tool_args.named.insert(key.clone(), val);
            }
            Arg::ShortFlag(name) => {
                // Combined short flags like -nv expand per character.
                for c in name.chars() {
                    tool_args.flags.insert(c.to_string());
                }
            }
            Arg::LongFlag(name) => {
                tool_args.flags.insert(name.clone());
            }
        }
    }

    Ok(tool_args)
}

fn eval_arg(expr: &Expr, ctx: &ExecContext) -> Result<Value, String> {
    match eval_expr(expr, &ctx.scope) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err("command substitution is not allowed in pipeline arguments".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Render a pipeline back to source-like text, for job listings.
pub fn format_pipeline(commands: &[Command]) -> String {
    commands
        .iter()
        .map(format_command)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_command(cmd: &Command) -> String {
    let mut s = match &cmd.head {
        CommandHead::Tool(name) => name.clone(),
        CommandHead::Method { target, method } => format!("${}:{}", target, method),
    };
    for arg in &cmd.args {
        s.push(' ');
        s.push_str(&format_arg(arg));
    }
    s
}

fn format_arg(arg: &Arg) -> String {
    match arg {
        Arg::Positional(expr) => format_expr(expr),
        Arg::Named { key, value } => format!("{}={}", key, format_expr(value)),
        Arg::ShortFlag(name) => format!("-{}", name),
        Arg::LongFlag(name) => format!("--{}", name),
    }
}

fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(Value::String(s)) => s.clone(),
        Expr::Literal(value) => value.to_string(),
        Expr::VarRef(name) => format!("${}", name),
        Expr::Interpolated(_) => "\"...\"".to_string(),
        Expr::CommandSubst(pipeline) => format!("$({})", format_pipeline(&pipeline.commands)),
    }
}
