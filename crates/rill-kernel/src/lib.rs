//! rill-kernel — an embeddable async pipeline shell kernel.
//!
//! rill is a tiny shell-like language for wiring data streams together:
//! assignments, pipelines, shared pipes, and background jobs. The kernel
//! is the library heart; the `rill` binary wraps it in a REPL.
//!
//! ```rill
//! P=$(pipe)
//! WRITER=$(seq 10000 | $P:output | bg)
//! READER=$($P:input | sum | bg)
//! fg $WRITER
//! $P:close
//! fg $READER        # 50005000
//! ```
//!
//! The pieces:
//! - [`lexer`] / [`parser`] / [`ast`] — source text to syntax tree
//! - [`interpreter`] — scopes, expression evaluation, [`ExecResult`]
//! - [`scheduler`] — shared pipes, background jobs, the pipeline runner
//! - [`tools`] — the `Tool` trait and the builtin set
//! - [`Kernel`] — the façade that ties it all together

pub mod ast;
pub mod interpreter;
pub mod kernel;
pub mod lexer;
pub mod parser;
pub mod scheduler;
pub mod tools;

pub use ast::Value;
pub use interpreter::{ExecResult, Scope};
pub use kernel::{Kernel, KernelConfig};
pub use scheduler::{JobId, JobManager, PipeId, PipeRegistry};
pub use tools::{Tool, ToolRegistry};
