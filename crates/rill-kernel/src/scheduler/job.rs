//! Background job management.
//!
//! Pipelines ending in `bg` run as background jobs tracked here. The
//! `fg` and `wait` tools consume the results.
//!
//! Each job publishes its result through a `watch` channel: the spawned
//! task sends exactly once when it finishes, and every waiter holds its
//! own receiver. Waiting therefore never holds the manager's map lock
//! across an await, so a background job can itself `fg` another job
//! without deadlocking, and any number of waiters can wait on the same
//! id concurrently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::interpreter::ExecResult;

/// Unique identifier for a background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a background job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Done,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Done => write!(f, "Done"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Information about a job for listing.
#[derive(Debug, Clone)]
pub struct JobInfo {
    pub id: JobId,
    /// Command description, as shown by `jobs`.
    pub command: String,
    pub status: JobStatus,
}

/// A background job.
pub struct Job {
    pub id: JobId,
    pub command: String,
    /// Receives the result when the task finishes. If the sender drops
    /// without sending, the task panicked.
    result: watch::Receiver<Option<ExecResult>>,
}

impl Job {
    pub fn new(id: JobId, command: String, result: watch::Receiver<Option<ExecResult>>) -> Self {
        Self {
            id,
            command,
            result,
        }
    }

    /// Check if the job's task has finished, waited on or not.
    pub fn is_done(&self) -> bool {
        self.result.borrow().is_some() || self.result.has_changed().is_err()
    }

    pub fn status(&self) -> JobStatus {
        if let Some(result) = &*self.result.borrow() {
            return if result.ok() {
                JobStatus::Done
            } else {
                JobStatus::Failed
            };
        }
        // Sender gone with no value: the task panicked.
        if self.result.has_changed().is_err() {
            return JobStatus::Failed;
        }
        JobStatus::Running
    }

    /// A fresh receiver for waiting on this job's result.
    fn subscribe(&self) -> watch::Receiver<Option<ExecResult>> {
        self.result.clone()
    }
}

/// Manager for background jobs.
pub struct JobManager {
    next_id: AtomicU64,
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobManager {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawn a future as a background job. The job is registered before
    /// this returns, so the id is immediately valid for `wait`.
    pub async fn spawn<F>(&self, command: String, future: F) -> JobId
    where
        F: std::future::Future<Output = ExecResult> + Send + 'static,
    {
        let id = JobId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = watch::channel(None);
        tokio::spawn(async move {
            let result = future.await;
            let _ = tx.send(Some(result));
        });

        let mut jobs = self.jobs.lock().await;
        jobs.insert(id, Job::new(id, command, rx));

        id
    }

    /// Wait for a specific job. Returns `None` for unknown ids.
    ///
    /// The map lock is only held long enough to clone the job's
    /// receiver; the await happens outside it.
    pub async fn wait(&self, id: JobId) -> Option<ExecResult> {
        let mut rx = {
            let jobs = self.jobs.lock().await;
            jobs.get(&id)?.subscribe()
        };

        let result = match rx.wait_for(|result| result.is_some()).await {
            Ok(result) => result.clone(),
            Err(_) => Some(ExecResult::failure(1, format!("job panicked: [{}]", id))),
        };
        result
    }

    /// Wait for all jobs, returning (id, result) pairs sorted by id.
    pub async fn wait_all(&self) -> Vec<(JobId, ExecResult)> {
        let mut ids: Vec<JobId> = {
            let jobs = self.jobs.lock().await;
            jobs.keys().copied().collect()
        };
        ids.sort_by_key(|id| id.0);

        let mut results = Vec::new();
        for id in ids {
            if let Some(result) = self.wait(id).await {
                results.push((id, result));
            }
        }
        results
    }

    /// List all jobs with their status, sorted by id.
    pub async fn list(&self) -> Vec<JobInfo> {
        let jobs = self.jobs.lock().await;
        let mut infos: Vec<JobInfo> = jobs
            .values()
            .map(|job| JobInfo {
                id: job.id,
                command: job.command.clone(),
                status: job.status(),
            })
            .collect();
        infos.sort_by_key(|info| info.id.0);
        infos
    }

    /// Number of jobs whose task has not finished.
    pub async fn running_count(&self) -> usize {
        let jobs = self.jobs.lock().await;
        jobs.values().filter(|j| !j.is_done()).count()
    }

    /// Remove finished jobs from tracking.
    pub async fn cleanup(&self) {
        let mut jobs = self.jobs.lock().await;
        jobs.retain(|_, job| !job.is_done());
    }

    /// Check if a job exists.
    pub async fn exists(&self, id: JobId) -> bool {
        let jobs = self.jobs.lock().await;
        jobs.contains_key(&id)
    }

    /// Get info for a specific job.
    pub async fn get(&self, id: JobId) -> Option<JobInfo> {
        let jobs = self.jobs.lock().await;
        jobs.get(&id).map(|job| JobInfo {
            id: job.id,
            command: job.command.clone(),
            status: job.status(),
        })
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn spawn_and_wait() {
        let manager = JobManager::new();

        let id = manager
            .spawn("test".to_string(), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                ExecResult::success("done")
            })
            .await;

        let result = manager.wait(id).await.unwrap();
        assert!(result.ok());
        assert_eq!(result.out, "done");
    }

    #[tokio::test]
    async fn wait_twice_returns_the_same_result() {
        let manager = JobManager::new();
        let id = manager
            .spawn("once".to_string(), async { ExecResult::success("value") })
            .await;

        let first = manager.wait(id).await.unwrap();
        let second = manager.wait(id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_waiters_on_the_same_job() {
        let manager = Arc::new(JobManager::new());
        let id = manager
            .spawn("shared".to_string(), async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                ExecResult::success("x")
            })
            .await;

        let other = Arc::clone(&manager);
        let task = tokio::spawn(async move { other.wait(id).await });

        let a = manager.wait(id).await.unwrap();
        let b = task.await.unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.out, "x");
    }

    #[tokio::test]
    async fn waiting_does_not_block_other_jobs() {
        // A job that waits on another job while the caller waits on it.
        let manager = Arc::new(JobManager::new());
        let inner = manager
            .spawn("inner".to_string(), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                ExecResult::success("inner done\n")
            })
            .await;

        let chained = Arc::clone(&manager);
        let outer = manager
            .spawn("outer".to_string(), async move {
                match chained.wait(inner).await {
                    Some(result) => result,
                    None => ExecResult::failure(1, "missing inner job"),
                }
            })
            .await;

        let result = timeout(Duration::from_secs(3), manager.wait(outer))
            .await
            .expect("nested wait should not hang")
            .unwrap();
        assert_eq!(result.out, "inner done\n");
    }

    #[tokio::test]
    async fn wait_all_returns_sorted_results() {
        let manager = JobManager::new();

        manager
            .spawn("slow".to_string(), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                ExecResult::success("one")
            })
            .await;
        manager
            .spawn("fast".to_string(), async { ExecResult::success("two") })
            .await;

        let results = manager.wait_all().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, JobId(1));
        assert_eq!(results[1].0, JobId(2));
    }

    #[tokio::test]
    async fn list_shows_running_then_done() {
        let manager = JobManager::new();
        let id = manager
            .spawn("sleeper".to_string(), async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                ExecResult::success("")
            })
            .await;

        let jobs = manager.list().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].command, "sleeper");
        assert_eq!(jobs[0].status, JobStatus::Running);

        let _ = manager.wait(id).await;
        assert_eq!(manager.get(id).await.unwrap().status, JobStatus::Done);
    }

    #[tokio::test]
    async fn finished_job_shows_done_without_wait() {
        let manager = JobManager::new();
        let id = manager
            .spawn("quick".to_string(), async { ExecResult::success("") })
            .await;

        // Poll until the task's result lands; no wait() involved.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
        loop {
            if manager.get(id).await.unwrap().status == JobStatus::Done {
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "status never left Running"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        manager.cleanup().await;
        assert!(!manager.exists(id).await);
    }

    #[tokio::test]
    async fn failed_job_status() {
        let manager = JobManager::new();
        let id = manager
            .spawn("broken".to_string(), async {
                ExecResult::failure(1, "intentional failure")
            })
            .await;

        let result = manager.wait(id).await.unwrap();
        assert!(!result.ok());
        assert_eq!(manager.get(id).await.unwrap().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn cleanup_removes_completed() {
        let manager = JobManager::new();
        let id = manager
            .spawn("done".to_string(), async { ExecResult::success("") })
            .await;
        let _ = manager.wait(id).await;

        assert_eq!(manager.list().await.len(), 1);
        manager.cleanup().await;
        assert_eq!(manager.list().await.len(), 0);
        assert!(!manager.exists(id).await);
    }

    #[tokio::test]
    async fn nonexistent_job() {
        let manager = JobManager::new();
        assert!(manager.wait(JobId(999)).await.is_none());
        assert!(manager.get(JobId(999)).await.is_none());
    }

    #[tokio::test]
    async fn running_count_tracks_completion() {
        let manager = JobManager::new();
        assert_eq!(manager.running_count().await, 0);

        let id = manager
            .spawn("sleeper".to_string(), async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                ExecResult::success("")
            })
            .await;
        assert_eq!(manager.running_count().await, 1);

        let _ = manager.wait(id).await;
        assert_eq!(manager.running_count().await, 0);
    }
}
