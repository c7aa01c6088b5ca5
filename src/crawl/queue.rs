//! Bounded FIFO work queue with close-on-zero termination.
//!
//! Classic wait-group accounting fails here because children are
//! discovered while tasks run, so no producer can declare "done" up
//! front. Instead the queue tracks an active-task count = tasks in the
//! queue + tasks being processed. Enqueueing increments the count
//! *before* the send; finishing a task decrements it; the decrement that
//! reaches zero closes the queue, exactly once. Workers drain the queue
//! until it is closed and empty, then exit.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::models::UrlTask;

/// Per-crawl work queue shared by all workers.
#[derive(Debug)]
pub struct WorkQueue {
    /// Sender side; dropped by the closer. Present iff the queue is open.
    tx: Mutex<Option<mpsc::Sender<UrlTask>>>,
    /// Receiver side, shared by workers. The lock is only held while a
    /// worker waits for its next task.
    rx: tokio::sync::Mutex<mpsc::Receiver<UrlTask>>,
    /// Tasks in the queue plus tasks being processed.
    active: AtomicI64,
}

impl WorkQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx: tokio::sync::Mutex::new(rx),
            active: AtomicI64::new(0),
        }
    }

    /// Enqueues a task, bumping the active count before the send so the
    /// count can never be observed at zero while work remains. Blocks
    /// when the queue is at capacity (backpressure). Returns false if the
    /// queue already closed, which only happens on cancelled runs.
    pub async fn push(&self, task: UrlTask) -> bool {
        self.active.fetch_add(1, Ordering::SeqCst);
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let sent = match tx {
            Some(tx) => tx.send(task).await.is_ok(),
            None => false,
        };
        if !sent {
            // The task never entered the queue; undo its slot.
            self.task_done();
        }
        sent
    }

    /// Receives the next task, or `None` once the queue is closed and
    /// drained.
    pub async fn next_task(&self) -> Option<UrlTask> {
        self.rx.lock().await.recv().await
    }

    /// Marks one task finished (processed, skipped, or failed). The
    /// caller that brings the count to zero closes the queue; no other
    /// agent ever closes it.
    pub fn task_done(&self) {
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tx.lock().unwrap_or_else(|e| e.into_inner()).take();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> i64 {
        self.active.load(Ordering::SeqCst)
    }
}
