//! The tool system: trait, execution context, registry, and builtins.

pub mod builtin;
mod context;
mod registry;
mod traits;

pub use context::ExecContext;
pub use registry::ToolRegistry;
pub use traits::{ParamSchema, Tool, ToolArgs, ToolSchema};
