//! Worker pool for parallel validation-batch preparation.
//!
//! A small thread pool fed through bounded channels:
//! - Task channel: main thread -> workers (work distribution)
//! - Output channel: workers -> main thread (result collection)
//! - Shutdown flag: enables graceful termination
//!
//! Bounded channels keep memory proportional to one batch, and dropping the
//! pool closes the task channel and joins every worker.

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Thread pool generic over the task and output types.
pub(crate) struct WorkerPool<Task, Output> {
    workers: Vec<thread::JoinHandle<()>>,
    task_tx: Option<Sender<Task>>,
    output_rx: Receiver<Output>,
    shutdown: Arc<AtomicBool>,
}

impl<Task, Output> WorkerPool<Task, Output>
where
    Task: Send + 'static,
    Output: Send + 'static,
{
    /// Spawns `num_workers` threads pulling from a shared task queue.
    ///
    /// `buffer_size` bounds both channels; it must hold a full batch so the
    /// submitting thread can enqueue a batch's tasks before collecting any
    /// output.
    pub(crate) fn new<F>(num_workers: usize, buffer_size: usize, worker_fn: F) -> Result<Self>
    where
        F: Fn(Receiver<Task>, Sender<Output>, Arc<AtomicBool>) + Send + Sync + 'static,
    {
        if num_workers == 0 {
            return Err(anyhow!(
                "Cannot create WorkerPool with 0 workers. \
                Either set num_workers > 0 or use single-threaded mode."
            ));
        }
        if buffer_size == 0 {
            return Err(anyhow!(
                "Cannot create WorkerPool with buffer_size 0. \
                Buffer size must be > 0 to prevent deadlocks."
            ));
        }

        let (task_tx, task_rx) = bounded(buffer_size);
        let (output_tx, output_rx) = bounded(buffer_size);

        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_fn = Arc::new(worker_fn);
        let mut workers = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let task_rx = task_rx.clone();
            let output_tx = output_tx.clone();
            let shutdown_clone = shutdown.clone();
            let worker_fn_clone = worker_fn.clone();

            let handle = thread::Builder::new()
                .name(format!("val-loader-worker-{}", worker_id))
                .spawn(move || {
                    worker_fn_clone(task_rx, output_tx, shutdown_clone);
                })
                .with_context(|| format!("Failed to spawn worker thread {}", worker_id))?;

            workers.push(handle);
        }

        Ok(Self {
            workers,
            task_tx: Some(task_tx),
            output_rx,
            shutdown,
        })
    }

    /// Enqueues a task, blocking while the task channel is full.
    pub(crate) fn submit(&self, task: Task) -> Result<()> {
        self.task_tx
            .as_ref()
            .ok_or_else(|| anyhow!("Worker pool is shut down"))?
            .send(task)
            .map_err(|_| anyhow!("All workers have exited"))
    }

    /// Waits for the next completed task.
    pub(crate) fn recv_timeout(&self, timeout: Duration) -> Result<Output> {
        self.output_rx
            .recv_timeout(timeout)
            .context("Timed out waiting for a worker result")
    }
}

impl<Task, Output> Drop for WorkerPool<Task, Output> {
    fn drop(&mut self) {
        // Signal shutdown to all workers
        self.shutdown.store(true, Ordering::Relaxed);

        // Drop the task sender to close the channel
        self.task_tx.take();

        // Wait for workers to finish
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
