//! Shared pipes with broadcast-replay semantics.
//!
//! A `SharedPipe` is a line-oriented stream with one history and any
//! number of independent readers. Every reader starts at position zero
//! and replays the full history before blocking for live data, so what
//! a reader observes does not depend on when it subscribed relative to
//! the producer:
//!
//! ```text
//!   sender(s) ──▶ [Vec<String> history, closed flag]
//!                      ├── reader A (cursor 0..n)
//!                      ├── reader B (cursor 0..n)
//!                      └── reader C (cursor 0..n)   all see every line
//! ```
//!
//! Implementation uses `std::sync::Mutex` (not tokio) since critical
//! sections are just Vec operations. Reader wakers are stored under the
//! lock to prevent lost wakeups; every send or close drains them.

use std::collections::HashMap;
use std::fmt;
use std::future::poll_fn;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Poll, Waker};

use thiserror::Error;

/// Unique identifier for a registered pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipeId(pub u64);

impl fmt::Display for PipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%pipe/{}", self.0)
    }
}

/// Errors from pipe operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipeError {
    #[error("pipe is closed")]
    Closed,
}

struct PipeState {
    /// Full history of sent lines. Readers replay from index 0.
    history: Vec<String>,
    closed: bool,
    /// Wakers of readers parked at the end of the history.
    waiting: Vec<Waker>,
}

/// A broadcast pipe: unbounded history, many independent readers.
pub struct SharedPipe {
    state: Mutex<PipeState>,
}

impl SharedPipe {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PipeState {
                history: Vec::new(),
                closed: false,
                waiting: Vec::new(),
            }),
        }
    }

    /// Send one line into the pipe, waking any parked readers.
    pub fn send(&self, line: impl Into<String>) -> Result<(), PipeError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.closed {
            return Err(PipeError::Closed);
        }
        state.history.push(line.into());
        for waker in state.waiting.drain(..) {
            waker.wake();
        }
        Ok(())
    }

    /// Close the pipe. Readers drain remaining history, then see
    /// end-of-stream. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.closed = true;
        for waker in state.waiting.drain(..) {
            waker.wake();
        }
    }

    pub fn is_closed(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.closed
    }

    /// Number of lines sent so far.
    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a reader at the beginning of the history.
    pub fn subscribe(self: &Arc<Self>) -> PipeReader {
        PipeReader {
            pipe: Arc::clone(self),
            cursor: 0,
        }
    }
}

impl Default for SharedPipe {
    fn default() -> Self {
        Self::new()
    }
}

/// One reader's view of a [`SharedPipe`].
pub struct PipeReader {
    pipe: Arc<SharedPipe>,
    cursor: usize,
}

impl PipeReader {
    /// Receive the next line, or `None` once the pipe is closed and the
    /// history is drained.
    pub async fn recv(&mut self) -> Option<String> {
        poll_fn(|cx| {
            let mut state = self.pipe.state.lock().unwrap_or_else(|e| e.into_inner());
            if self.cursor < state.history.len() {
                let line = state.history[self.cursor].clone();
                self.cursor += 1;
                return Poll::Ready(Some(line));
            }
            if state.closed {
                return Poll::Ready(None);
            }
            state.waiting.push(cx.waker().clone());
            Poll::Pending
        })
        .await
    }

    /// Drain the stream to end-of-stream, returning all lines.
    pub async fn read_to_end(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.recv().await {
            lines.push(line);
        }
        lines
    }
}

/// Registry of live pipes, keyed by [`PipeId`].
///
/// Handles in scope refer to pipes through this registry, so a cloned
/// scope (a background job) still reaches the same pipe.
pub struct PipeRegistry {
    next_id: AtomicU64,
    pipes: Mutex<HashMap<PipeId, Arc<SharedPipe>>>,
}

impl PipeRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pipes: Mutex::new(HashMap::new()),
        }
    }

    /// Create and register a new pipe.
    pub fn create(&self) -> (PipeId, Arc<SharedPipe>) {
        let id = PipeId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let pipe = Arc::new(SharedPipe::new());
        let mut pipes = self.pipes.lock().unwrap_or_else(|e| e.into_inner());
        pipes.insert(id, Arc::clone(&pipe));
        (id, pipe)
    }

    /// Look up a pipe by id.
    pub fn get(&self, id: PipeId) -> Option<Arc<SharedPipe>> {
        let pipes = self.pipes.lock().unwrap_or_else(|e| e.into_inner());
        pipes.get(&id).cloned()
    }

    /// Number of registered pipes.
    pub fn count(&self) -> usize {
        let pipes = self.pipes.lock().unwrap_or_else(|e| e.into_inner());
        pipes.len()
    }
}

impl Default for PipeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
