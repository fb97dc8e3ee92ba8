//! Builtin tools.
//!
//! `bg` is deliberately absent: it is a pipeline form handled by the
//! runner, because it has to capture the stages before it.

mod count;
mod echo;
mod fg;
mod head;
mod jobs;
mod pipe;
mod seq;
mod sleep;
mod sum;
mod wait;

pub use count::Count;
pub use echo::Echo;
pub use fg::Fg;
pub use head::Head;
pub use jobs::Jobs;
pub use pipe::Pipe;
pub use seq::Seq;
pub use sleep::Sleep;
pub use sum::Sum;
pub use wait::Wait;

use std::sync::Arc;

use super::ToolRegistry;

/// Register the full builtin set.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(Arc::new(Count));
    registry.register(Arc::new(Echo));
    registry.register(Arc::new(Fg));
    registry.register(Arc::new(Head));
    registry.register(Arc::new(Jobs));
    registry.register(Arc::new(Pipe));
    registry.register(Arc::new(Seq));
    registry.register(Arc::new(Sleep));
    registry.register(Arc::new(Sum));
    registry.register(Arc::new(Wait));
}
