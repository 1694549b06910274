use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};
use crate::worker::{WorkerError, WorkerResult};

pub const DEFAULT_WORKERS: usize = 8;

/// Fixed number of worker slots shared by the items of a batch.
///
/// A slot is held for as long as the returned [`WorkerSlot`] lives, so the
/// number of items running at once never exceeds `worker_count` regardless
/// of how many files the batch has.
#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    active_workers: Arc<AtomicUsize>,
    worker_count: usize,
}

/// An acquired worker slot. Dropping it frees the slot.
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
    active_workers: Arc<AtomicUsize>,
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.active_workers.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WorkerPool {
    pub fn new(worker_count: Option<usize>) -> Self {
        let worker_count = worker_count.unwrap_or(DEFAULT_WORKERS).max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(worker_count)),
            active_workers: Arc::new(AtomicUsize::new(0)),
            worker_count,
        }
    }

    /// Waits for a free slot.
    pub async fn acquire(&self) -> WorkerResult<WorkerSlot> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.map_err(|e| {
            warn!("Failed to acquire semaphore: {}", e);
            WorkerError::from(e)
        })?;

        let current_workers = self.active_workers.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Worker slot acquired - Active: {}/{}, Available permits: {}",
            current_workers,
            self.worker_count,
            self.semaphore.available_permits()
        );

        Ok(WorkerSlot {
            _permit: permit,
            active_workers: Arc::clone(&self.active_workers),
        })
    }

    /// Stops handing out slots; pending and future `acquire` calls fail.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::SeqCst)
    }
}
