//! Bounded worker pool for fallible provider calls.
//!
//! Tasks run on the blocking pool, gated by a semaphore sized to the
//! configured worker count. The first error shuts the pool down: the
//! semaphore closes so queued tasks fail fast, and in-flight tasks are
//! aborted at their next suspension point.

use std::sync::{Arc, Mutex};

use clasp_util::errors::ClaspError;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};

pub struct Executor {
    semaphore: Arc<Semaphore>,
    aborts: Mutex<Vec<AbortHandle>>,
}

impl Executor {
    /// Create a pool admitting at most `workers` concurrent tasks.
    pub fn new(workers: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            aborts: Mutex::new(Vec::new()),
        }
    }

    /// Submit a fallible task, returning a single-use handle for its result.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ClaspError> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|_| {
                ClaspError::Canceled {
                    message: "executor shut down".to_string(),
                }
            })?;
            match tokio::task::spawn_blocking(task).await {
                Ok(result) => result,
                Err(e) => Err(ClaspError::Canceled {
                    message: format!("worker failed: {e}"),
                }),
            }
        });
        if let Ok(mut aborts) = self.aborts.lock() {
            aborts.push(handle.abort_handle());
        }
        TaskHandle { inner: handle }
    }

    /// Abort all outstanding work. Pending handles resolve to
    /// [`ClaspError::Canceled`]; tasks already running on the blocking
    /// pool finish but their results are discarded.
    pub fn shutdown(&self) {
        self.semaphore.close();
        if let Ok(aborts) = self.aborts.lock() {
            for abort in aborts.iter() {
                abort.abort();
            }
        }
    }
}

/// Single-use handle to a submitted task's result.
pub struct TaskHandle<T> {
    inner: JoinHandle<Result<T, ClaspError>>,
}

impl<T> TaskHandle<T> {
    /// Wait for the task to complete and take its result.
    pub async fn join(self) -> Result<T, ClaspError> {
        match self.inner.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ClaspError::Canceled {
                message: "task aborted".to_string(),
            }),
            Err(e) => Err(ClaspError::Canceled {
                message: format!("worker panicked: {e}"),
            }),
        }
    }
}
