//! Scheduling: shared pipes, background jobs, and the pipeline runner.

mod job;
mod pipe;
mod pipeline;

pub use job::{Job, JobId, JobInfo, JobManager, JobStatus};
pub use pipe::{PipeError, PipeId, PipeReader, PipeRegistry, SharedPipe};
pub use pipeline::{format_pipeline, PipelineRunner};
