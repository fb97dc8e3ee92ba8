//! Execution context passed to every tool.

use std::sync::Arc;

use crate::interpreter::Scope;
use crate::scheduler::{JobManager, PipeRegistry};

/// Everything a tool can see while executing: a scope snapshot, the
/// piped-in stdin (if any), and the shared job and pipe registries.
///
/// Background jobs get a clone; the registries are `Arc`s, so handles
/// in the cloned scope still reach the same pipes and jobs.
#[derive(Clone)]
pub struct ExecContext {
    /// Variable scope snapshot for argument evaluation.
    pub scope: Scope,
    /// Piped input from the previous pipeline stage.
    stdin: Option<String>,
    /// Background job tracking.
    pub jobs: Arc<JobManager>,
    /// Live pipes.
    pub pipes: Arc<PipeRegistry>,
}

impl ExecContext {
    pub fn new(jobs: Arc<JobManager>, pipes: Arc<PipeRegistry>) -> Self {
        Self {
            scope: Scope::new(),
            stdin: None,
            jobs,
            pipes,
        }
    }

    /// Replace the scope snapshot.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set piped input for the next execution.
    pub fn set_stdin(&mut self, input: String) {
        self.stdin = Some(input);
    }

    /// Take the piped input, leaving None.
    pub fn take_stdin(&mut self) -> Option<String> {
        self.stdin.take()
    }
}
