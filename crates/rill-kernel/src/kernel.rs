//! The Kernel façade: parse and execute rill source.
//!
//! One `Kernel` owns the scope, the tool registry, the job manager,
//! and the pipe registry. It is the only public entry point for
//! running code; the REPL and script runner both go through
//! [`Kernel::execute`].

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::ast::{Expr, Pipeline, Stmt, Value};
use crate::interpreter::{eval_expr, ExecResult, Scope};
use crate::parser;
use crate::scheduler::{JobManager, PipelineRunner, PipeRegistry};
use crate::tools::builtin::register_builtins;
use crate::tools::{ExecContext, ToolRegistry, ToolSchema};

/// Kernel configuration.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Name used in tracing spans, to tell kernels apart.
    pub name: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            name: "rill".to_string(),
        }
    }
}

impl KernelConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An executing rill instance.
pub struct Kernel {
    name: String,
    scope: RwLock<Scope>,
    tools: Arc<ToolRegistry>,
    jobs: Arc<JobManager>,
    pipes: Arc<PipeRegistry>,
    runner: PipelineRunner,
}

impl Kernel {
    /// Create a kernel with the builtin tool set.
    pub fn new(config: KernelConfig) -> Result<Self> {
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry);
        let tools = Arc::new(registry);

        Ok(Self {
            name: config.name,
            scope: RwLock::new(Scope::new()),
            tools: Arc::clone(&tools),
            jobs: Arc::new(JobManager::new()),
            pipes: Arc::new(PipeRegistry::new()),
            runner: PipelineRunner::new(tools),
        })
    }

    /// Parse and execute source text, returning the last statement's
    /// result. Parse errors fail the whole input; execution failures
    /// are reported through the returned [`ExecResult`].
    #[instrument(skip_all, fields(kernel = %self.name))]
    pub async fn execute(&self, input: &str) -> Result<ExecResult> {
        self.execute_streaming(input, |_| {}).await
    }

    /// Like [`execute`](Self::execute), but invokes `on_result` after
    /// every statement, for line-by-line display.
    pub async fn execute_streaming(
        &self,
        input: &str,
        mut on_result: impl FnMut(&ExecResult) + Send,
    ) -> Result<ExecResult> {
        let program = parser::parse(input).map_err(|errs| {
            let messages: Vec<String> = errs.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(messages.join("; "))
        })?;

        let mut last = ExecResult::default();
        for stmt in &program.statements {
            last = self.execute_stmt(stmt).await;
            {
                let mut scope = self.scope.write().await;
                scope.set_last_result(last.clone());
            }
            on_result(&last);
        }
        Ok(last)
    }

    async fn execute_stmt(&self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Assignment(assignment) => {
                debug!(name = %assignment.name, "assignment");
                match self.eval(&assignment.value).await {
                    Ok(value) => {
                        let mut scope = self.scope.write().await;
                        scope.set(&assignment.name, value);
                        ExecResult::success("")
                    }
                    // A failing substitution fails the assignment and
                    // leaves the variable untouched.
                    Err(result) => result,
                }
            }
            Stmt::Pipeline(pipeline) => self.execute_pipeline(pipeline).await,
        }
    }

    /// Evaluate an expression, running command substitutions.
    async fn eval(&self, expr: &Expr) -> Result<Value, ExecResult> {
        {
            let scope = self.scope.read().await;
            match eval_expr(expr, &scope) {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) => return Err(ExecResult::failure(1, e.to_string())),
            }
        }

        // Command substitution is the only deferred case.
        match expr {
            Expr::CommandSubst(pipeline) => {
                let result = self.execute_pipeline(pipeline).await;
                if result.ok() {
                    Ok(result.capture())
                } else {
                    Err(result)
                }
            }
            _ => Err(ExecResult::failure(1, "unevaluable expression")),
        }
    }

    async fn execute_pipeline(&self, pipeline: &Pipeline) -> ExecResult {
        let scope = { self.scope.read().await.clone() };
        let mut ctx =
            ExecContext::new(Arc::clone(&self.jobs), Arc::clone(&self.pipes)).with_scope(scope);
        self.runner.run(&pipeline.commands, &mut ctx).await
    }

    /// Get a variable from the kernel scope.
    pub async fn get_var(&self, name: &str) -> Option<Value> {
        let scope = self.scope.read().await;
        scope.get(name).cloned()
    }

    /// Set a variable in the kernel scope.
    pub async fn set_var(&self, name: impl Into<String>, value: Value) {
        let mut scope = self.scope.write().await;
        scope.set(name, value);
    }

    /// The result of the most recent statement.
    pub async fn last_result(&self) -> ExecResult {
        self.scope.read().await.last_result().clone()
    }

    /// All scope variables, sorted by name.
    pub async fn vars(&self) -> Vec<(String, Value)> {
        self.scope.read().await.all()
    }

    /// Sorted names of the registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.names().iter().map(|s| s.to_string()).collect()
    }

    /// Schemas of the registered tools, for help output.
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools.schemas()
    }

    /// The job manager, for direct inspection.
    pub fn jobs(&self) -> &Arc<JobManager> {
        &self.jobs
    }

    /// Wait for all outstanding background jobs.
    pub async fn shutdown(&self) {
        let results = self.jobs.wait_all().await;
        debug!(jobs = results.len(), "kernel shutdown complete");
    }
}
